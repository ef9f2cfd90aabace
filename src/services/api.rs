// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step-challenge API client.
//!
//! Handles:
//! - Step submissions for daily, friend, and event sessions
//! - Joining a challenge or event
//! - Fetching friend-challenge progress
//!
//! Every request carries the user's bearer token.

use crate::error::{Result, TrackerError};
use crate::models::SessionKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/user/steps/daily/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStepUpdate {
    pub steps: u64,
}

/// Body of `POST /v1/user/steps/friend/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendStepUpdate {
    pub steps: u64,
    pub completed: bool,
    pub goal_reached: bool,
}

/// Body of `POST /v1/user/steps/event/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventStepUpdate {
    pub steps: u64,
    pub completed: bool,
}

/// One participant's server-side progress.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParticipantProgress {
    #[serde(alias = "userId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub steps: u64,
}

#[derive(Debug, Deserialize)]
struct FriendProgressResponse {
    participants: Vec<ParticipantProgress>,
}

/// Remote operations used during a session.
#[async_trait]
pub trait ProgressApi: Send + Sync {
    async fn post_daily_steps(&self, challenge_id: &str, update: &DailyStepUpdate) -> Result<()>;

    async fn post_friend_steps(&self, challenge_id: &str, update: &FriendStepUpdate)
        -> Result<()>;

    async fn post_event_steps(&self, event_id: &str, update: &EventStepUpdate) -> Result<()>;

    /// Join a daily challenge, friend challenge, or event.
    async fn participate(&self, kind: SessionKind, id: &str) -> Result<()>;

    async fn friend_progress(&self, challenge_id: &str) -> Result<Vec<ParticipantProgress>>;
}

/// HTTP implementation of [`ProgressApi`].
#[derive(Clone)]
pub struct HttpProgressClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpProgressClient {
    /// Create a client for `base_url` (e.g. `https://api.example.com`).
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// POST a JSON body and ignore the response body.
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| TrackerError::Api(format!("Request failed: {}", e)))?;

        self.check_response(response).await?;
        Ok(())
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| TrackerError::Api(format!("Request failed: {}", e)))?;

        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| TrackerError::Api(format!("JSON parse error: {}", e)))
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("API rate limit hit (429)");
            return Err(TrackerError::Api(TrackerError::API_RATE_LIMIT.to_string()));
        }

        if status.as_u16() == 401 {
            return Err(TrackerError::Api(TrackerError::API_TOKEN_ERROR.to_string()));
        }

        Err(TrackerError::Api(format!("HTTP {}: {}", status, body)))
    }
}

#[async_trait]
impl ProgressApi for HttpProgressClient {
    async fn post_daily_steps(&self, challenge_id: &str, update: &DailyStepUpdate) -> Result<()> {
        self.post_json(&format!("/v1/user/steps/daily/{}", challenge_id), update)
            .await
    }

    async fn post_friend_steps(
        &self,
        challenge_id: &str,
        update: &FriendStepUpdate,
    ) -> Result<()> {
        self.post_json(&format!("/v1/user/steps/friend/{}", challenge_id), update)
            .await
    }

    async fn post_event_steps(&self, event_id: &str, update: &EventStepUpdate) -> Result<()> {
        self.post_json(&format!("/v1/user/steps/event/{}", event_id), update)
            .await
    }

    async fn participate(&self, kind: SessionKind, id: &str) -> Result<()> {
        let path = format!("/v1/user/participate/{}/{}", kind.api_segment(), id);
        self.post_json(&path, &serde_json::json!({})).await
    }

    async fn friend_progress(&self, challenge_id: &str) -> Result<Vec<ParticipantProgress>> {
        let path = format!("/v1/user/challenges/friend/{}/progress", challenge_id);
        let response: FriendProgressResponse = self.get_json(&path).await?;
        Ok(response.participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friend_update_body_is_camel_case() {
        let body = serde_json::to_value(FriendStepUpdate {
            steps: 4200,
            completed: false,
            goal_reached: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "steps": 4200, "completed": false, "goalReached": true })
        );
    }

    #[test]
    fn test_progress_accepts_user_id_alias() {
        let p: ParticipantProgress =
            serde_json::from_str(r#"{ "userId": "u9", "steps": 12 }"#).unwrap();
        assert_eq!(p.id, "u9");
        assert_eq!(p.name, "");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpProgressClient::new("https://api.example.com/", "t");
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
