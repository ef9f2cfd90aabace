// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session State Store.
//!
//! Holds the single active session plus its step, points, and elapsed-time
//! counters, and mirrors each field to its own storage key. Writes are
//! independent and unsequenced: a crash between two writes can leave the
//! persisted fields mutually stale, and the last write to complete wins per
//! key. Storage failures are logged and the in-memory value is kept.

use crate::models::{Checkpoint, Coordinate, Session};
use crate::services::geofence::materialize_fixed_checkpoints;
use crate::storage::{keys, KeyValueStore};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What to do with a persisted Event session when the store mounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventMountPolicy {
    /// Wipe all persisted session state if it belongs to an Event.
    #[default]
    ClearOnMount,
    /// Restore Event sessions like any other kind.
    Resume,
}

impl FromStr for EventMountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" | "clear-on-mount" => Ok(EventMountPolicy::ClearOnMount),
            "resume" => Ok(EventMountPolicy::Resume),
            other => Err(format!("unknown event mount policy: {}", other)),
        }
    }
}

/// Point-in-time copy of the store's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub steps: u64,
    pub points: u64,
    pub elapsed_secs: u64,
}

/// Owner of the active session.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<SessionSnapshot>,
}

impl SessionStore {
    /// Create an empty store without reading storage.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            state: Mutex::new(SessionSnapshot::default()),
        }
    }

    /// Mount the store: restore persisted state, applying `policy` to
    /// Event sessions.
    pub async fn init(storage: Arc<dyn KeyValueStore>, policy: EventMountPolicy) -> Self {
        let store = Self::new(storage);
        let restored = store.load_persisted().await;

        let restored_event = restored
            .session
            .as_ref()
            .is_some_and(|s| matches!(s, Session::Event(_)));

        if restored_event && policy == EventMountPolicy::ClearOnMount {
            tracing::info!(
                session_id = restored.session.as_ref().map(|s| s.id()),
                "Clearing persisted event session on mount"
            );
            store.clear_persisted().await;
            return store;
        }

        if let Some(session) = &restored.session {
            tracing::info!(
                session_id = session.id(),
                kind = %session.kind(),
                steps = restored.steps,
                elapsed_secs = restored.elapsed_secs,
                "Restored persisted session"
            );
        }
        *store.state.lock().await = restored;
        store
    }

    async fn load_persisted(&self) -> SessionSnapshot {
        let session = match self.read_key(keys::ACTIVE_SESSION).await {
            Some(blob) => match serde_json::from_str::<Session>(&blob) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable persisted session");
                    None
                }
            },
            None => None,
        };

        if session.is_none() {
            return SessionSnapshot::default();
        }

        SessionSnapshot {
            session,
            steps: self.read_counter(keys::SESSION_STEPS).await,
            points: self.read_counter(keys::SESSION_POINTS).await,
            elapsed_secs: self.read_counter(keys::SESSION_ELAPSED).await,
        }
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Storage read failed; using default");
                None
            }
        }
    }

    async fn read_counter(&self, key: &str) -> u64 {
        let Some(raw) = self.read_key(key).await else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring non-numeric counter");
            0
        })
    }

    async fn write_key(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value).await {
            tracing::warn!(key, error = %e, "Storage write failed");
        }
    }

    async fn write_session(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(blob) => self.write_key(keys::ACTIVE_SESSION, &blob).await,
            Err(e) => tracing::warn!(error = %e, "Failed to serialize session"),
        }
    }

    async fn clear_persisted(&self) {
        for key in keys::SESSION_KEYS {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(key, error = %e, "Storage delete failed");
            }
        }
    }

    // ─── Reads ───────────────────────────────────────────────────

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    pub async fn steps(&self) -> u64 {
        self.state.lock().await.steps
    }

    pub async fn points(&self) -> u64 {
        self.state.lock().await.points
    }

    pub async fn elapsed_secs(&self) -> u64 {
        self.state.lock().await.elapsed_secs
    }

    // ─── Mutations ───────────────────────────────────────────────

    /// Replace any existing session and zero every counter.
    pub async fn start_session(&self, session: Session) {
        tracing::info!(
            session_id = session.id(),
            kind = %session.kind(),
            started_at = %format_utc_rfc3339(session.start_time()),
            "Starting session"
        );
        {
            let mut state = self.state.lock().await;
            *state = SessionSnapshot {
                session: Some(session.clone()),
                ..SessionSnapshot::default()
            };
        }

        self.write_session(&session).await;
        self.write_key(keys::SESSION_STEPS, "0").await;
        self.write_key(keys::SESSION_ELAPSED, "0").await;
        self.write_key(keys::SESSION_POINTS, "0").await;
    }

    pub async fn update_steps(&self, steps: u64) {
        self.state.lock().await.steps = steps;
        self.write_key(keys::SESSION_STEPS, &steps.to_string()).await;
    }

    pub async fn update_points(&self, points: u64) {
        self.state.lock().await.points = points;
        self.write_key(keys::SESSION_POINTS, &points.to_string()).await;
    }

    /// Add to the points total and return the new total.
    pub async fn add_points(&self, delta: u64) -> u64 {
        let total = {
            let mut state = self.state.lock().await;
            state.points = state.points.saturating_add(delta);
            state.points
        };
        self.write_key(keys::SESSION_POINTS, &total.to_string()).await;
        total
    }

    pub async fn update_time(&self, elapsed_secs: u64) {
        self.state.lock().await.elapsed_secs = elapsed_secs;
        self.write_key(keys::SESSION_ELAPSED, &elapsed_secs.to_string())
            .await;
    }

    /// Advance the elapsed clock by one second and return the new value.
    pub async fn tick(&self) -> u64 {
        let elapsed = {
            let mut state = self.state.lock().await;
            state.elapsed_secs = state.elapsed_secs.saturating_add(1);
            state.elapsed_secs
        };
        self.write_key(keys::SESSION_ELAPSED, &elapsed.to_string())
            .await;
        elapsed
    }

    /// Replace one participant's step count.
    ///
    /// Unknown participants (or a non-friend session) are silently ignored;
    /// returns whether anything changed.
    pub async fn update_progress(&self, participant_id: &str, steps: u64) -> bool {
        let updated = {
            let mut state = self.state.lock().await;
            let found = match state.session.as_mut() {
                Some(Session::FriendChallenge(challenge)) => challenge
                    .participants
                    .iter_mut()
                    .find(|p| p.id == participant_id)
                    .map(|p| p.steps = steps)
                    .is_some(),
                _ => false,
            };
            if found {
                state.session.clone()
            } else {
                None
            }
        };

        match updated {
            Some(session) => {
                self.write_session(&session).await;
                true
            }
            None => {
                tracing::debug!(participant_id, "Ignoring progress for unknown participant");
                false
            }
        }
    }

    /// Place the active event's fixed checkpoints around `origin`.
    ///
    /// Happens at most once per session; later calls return an empty list.
    pub async fn place_fixed_checkpoints(&self, origin: Coordinate) -> Vec<Checkpoint> {
        let (placed, session) = {
            let mut state = self.state.lock().await;
            let Some(Session::Event(event)) = state.session.as_mut() else {
                return Vec::new();
            };
            if event.fixed_origin.is_some() || event.fixed_templates.is_empty() {
                return Vec::new();
            }

            let placed = materialize_fixed_checkpoints(&event.id, origin, &event.fixed_templates);
            event.checkpoints.extend(placed.iter().cloned());
            event.fixed_origin = Some(origin);
            (placed, state.session.clone())
        };

        tracing::info!(count = placed.len(), "Placed fixed checkpoints");
        if let Some(session) = session {
            self.write_session(&session).await;
        }
        placed
    }

    /// Clear the session and every counter, in memory and in storage.
    pub async fn end_session(&self) {
        let ended = std::mem::take(&mut *self.state.lock().await);
        if let Some(session) = &ended.session {
            tracing::info!(session_id = session.id(), steps = ended.steps, "Ending session");
        }
        self.clear_persisted().await;
    }

    /// Drop in-memory state without touching storage (teardown).
    pub async fn dispose(&self) {
        *self.state.lock().await = SessionSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;
    use crate::storage::MemoryStore;

    fn memory() -> (MemoryStore, Arc<dyn KeyValueStore>) {
        let store = MemoryStore::new();
        let dyn_store: Arc<dyn KeyValueStore> = Arc::new(store.clone());
        (store, dyn_store)
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "clear".parse::<EventMountPolicy>().unwrap(),
            EventMountPolicy::ClearOnMount
        );
        assert_eq!(
            " Resume ".parse::<EventMountPolicy>().unwrap(),
            EventMountPolicy::Resume
        );
        assert!("sometimes".parse::<EventMountPolicy>().is_err());
    }

    #[tokio::test]
    async fn test_start_session_resets_counters() {
        let (raw, storage) = memory();
        let store = SessionStore::new(storage);

        store.start_session(Session::daily("d-1")).await;
        store.update_steps(300).await;
        store.update_points(20).await;
        store.update_time(60).await;

        store.start_session(Session::daily("d-2")).await;
        let snap = store.snapshot().await;
        assert_eq!(snap.session.unwrap().id(), "d-2");
        assert_eq!((snap.steps, snap.points, snap.elapsed_secs), (0, 0, 0));
        assert_eq!(raw.get(keys::SESSION_STEPS).await.unwrap().as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn test_counters_persist_as_decimal_text() {
        let (raw, storage) = memory();
        let store = SessionStore::new(storage);
        store.start_session(Session::daily("d-1")).await;

        store.update_steps(1234).await;
        assert_eq!(store.add_points(15).await, 15);
        assert_eq!(store.add_points(10).await, 25);
        assert_eq!(store.tick().await, 1);

        assert_eq!(raw.get(keys::SESSION_STEPS).await.unwrap().as_deref(), Some("1234"));
        assert_eq!(raw.get(keys::SESSION_POINTS).await.unwrap().as_deref(), Some("25"));
        assert_eq!(raw.get(keys::SESSION_ELAPSED).await.unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_counters_saturate_at_max() {
        let (raw, storage) = memory();
        let store = SessionStore::new(storage);
        store.start_session(Session::daily("d-1")).await;

        store.update_time(u64::MAX).await;
        assert_eq!(store.tick().await, u64::MAX);
        assert_eq!(
            raw.get(keys::SESSION_ELAPSED).await.unwrap(),
            Some(u64::MAX.to_string())
        );

        store.update_points(u64::MAX - 1).await;
        assert_eq!(store.add_points(5).await, u64::MAX);
    }

    #[tokio::test]
    async fn test_update_progress_known_participant() {
        let (_raw, storage) = memory();
        let store = SessionStore::new(storage);
        store
            .start_session(Session::friend(
                "fc-1",
                1000,
                vec![Participant::new("me", "Me"), Participant::new("bob", "Bob")],
            ))
            .await;

        assert!(store.update_progress("bob", 700).await);
        let session = store.session().await.unwrap();
        assert_eq!(session.participants()[1].steps, 700);
        assert_eq!(session.participants()[0].steps, 0);
    }

    #[tokio::test]
    async fn test_update_progress_ignored_for_daily() {
        let (_raw, storage) = memory();
        let store = SessionStore::new(storage);
        store.start_session(Session::daily("d-1")).await;
        assert!(!store.update_progress("me", 10).await);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_memory_state() {
        let raw = MemoryStore::new_offline();
        let store = SessionStore::new(Arc::new(raw.clone()));

        store.start_session(Session::daily("d-1")).await;
        store.update_steps(50).await;

        assert_eq!(store.steps().await, 50);
        assert_eq!(store.session().await.unwrap().id(), "d-1");
        raw.set_offline(false);
        assert!(raw.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_counter_restores_as_zero() {
        let (raw, storage) = memory();
        let store = SessionStore::new(storage.clone());
        store.start_session(Session::daily("d-1")).await;
        raw.set(keys::SESSION_STEPS, "lots").await.unwrap();

        let restored = SessionStore::init(storage, EventMountPolicy::ClearOnMount).await;
        assert_eq!(restored.steps().await, 0);
        assert!(restored.session().await.is_some());
    }
}
