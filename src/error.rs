// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types shared across the session tracker.
//!
//! Most of these never reach the user: storage and network failures are
//! logged and swallowed at the call site. Only permission and validation
//! failures are surfaced.

/// Tracker error type.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Step sensor unavailable")]
    SensorUnavailable,

    #[error("Permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("No active session")]
    NoActiveSession,

    #[error("A session is already running")]
    SessionAlreadyRunning,

    #[error("Session is not running")]
    NotRunning,

    #[error("No checkpoint within activation radius")]
    NoCheckpointInRange,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl TrackerError {
    /// Marker for API rate limiting (HTTP 429).
    pub const API_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Marker for rejected bearer tokens (HTTP 401).
    pub const API_TOKEN_ERROR: &'static str = "Invalid or expired token";

    /// Whether an API error looks transient (rate limit or server-side).
    ///
    /// Nothing is retried; dropped-request logs carry this as `reason`.
    pub fn is_retryable_api_error(&self) -> bool {
        match self {
            TrackerError::Api(msg) => {
                msg == Self::API_RATE_LIMIT
                    || msg.starts_with("HTTP 5")
                    || msg.starts_with("Request failed")
            }
            _ => false,
        }
    }

    /// Whether this error came from a denied runtime permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, TrackerError::PermissionDenied(_))
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization(err.to_string())
    }
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
