// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fire-and-forget progress submission.
//!
//! Failures are logged and dropped. Nothing is retried and the user is never
//! told, so a lost request means lost step updates on the server.

use crate::error::TrackerError;
use crate::models::Session;
use crate::services::api::{DailyStepUpdate, EventStepUpdate, FriendStepUpdate, ProgressApi};
use crate::services::SessionStore;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Log label for a dropped request: would a later attempt likely succeed?
fn drop_reason(e: &TrackerError) -> &'static str {
    if e.is_retryable_api_error() {
        "transient"
    } else {
        "rejected"
    }
}

/// Post the current step count to the endpoint for the session's kind.
pub(crate) fn submit_steps(
    api: Arc<dyn ProgressApi>,
    session: &Session,
    steps: u64,
    completed: bool,
) -> JoinHandle<()> {
    let session = session.clone();

    tokio::spawn(async move {
        let result = match &session {
            Session::DailyChallenge(daily) => {
                api.post_daily_steps(&daily.id, &DailyStepUpdate { steps })
                    .await
            }
            Session::FriendChallenge(friend) => {
                let update = FriendStepUpdate {
                    steps,
                    completed,
                    goal_reached: steps >= friend.target_steps,
                };
                api.post_friend_steps(&friend.id, &update).await
            }
            Session::Event(event) => {
                api.post_event_steps(&event.id, &EventStepUpdate { steps, completed })
                    .await
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!(session_id = session.id(), steps, completed, "Step update posted")
            }
            Err(e) => tracing::warn!(
                session_id = session.id(),
                steps,
                reason = drop_reason(&e),
                error = %e,
                "Step update dropped"
            ),
        }
    })
}

/// Join the challenge or event on the server.
pub(crate) fn submit_participation(api: Arc<dyn ProgressApi>, session: &Session) -> JoinHandle<()> {
    let id = session.id().to_string();
    let kind = session.kind();

    tokio::spawn(async move {
        if let Err(e) = api.participate(kind, &id).await {
            tracing::warn!(
                session_id = %id,
                kind = %kind,
                reason = drop_reason(&e),
                error = %e,
                "Participation request dropped"
            );
        }
    })
}

/// Pull friends' progress and fold it into the store.
///
/// The local participant is skipped; its steps come from the sensor.
pub(crate) fn refresh_friend_progress(
    api: Arc<dyn ProgressApi>,
    store: Arc<SessionStore>,
    challenge_id: String,
    self_participant_id: Option<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let progress = match api.friend_progress(&challenge_id).await {
            Ok(progress) => progress,
            Err(e) => {
                tracing::warn!(
                    challenge_id = %challenge_id,
                    reason = drop_reason(&e),
                    error = %e,
                    "Friend progress fetch failed"
                );
                return;
            }
        };

        // The session may have ended or changed while the request was in flight
        let current = store.session().await;
        if current.as_ref().map(|s| s.id()) != Some(challenge_id.as_str()) {
            tracing::debug!(challenge_id = %challenge_id, "Discarding progress for inactive challenge");
            return;
        }

        for entry in progress {
            if self_participant_id.as_deref() == Some(entry.id.as_str()) {
                continue;
            }
            store.update_progress(&entry.id, entry.steps).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_reason_separates_transient_failures() {
        let transient = [
            TrackerError::Api(TrackerError::API_RATE_LIMIT.to_string()),
            TrackerError::Api("HTTP 503 Service Unavailable: down".to_string()),
            TrackerError::Api("Request failed: connection refused".to_string()),
        ];
        for e in &transient {
            assert_eq!(drop_reason(e), "transient", "{}", e);
        }

        let rejected = [
            TrackerError::Api(TrackerError::API_TOKEN_ERROR.to_string()),
            TrackerError::Api("HTTP 404 Not Found: gone".to_string()),
            TrackerError::NotRunning,
        ];
        for e in &rejected {
            assert_eq!(drop_reason(e), "rejected", "{}", e);
        }
    }
}
