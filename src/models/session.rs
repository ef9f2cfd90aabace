// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session model: the runtime record of one in-progress challenge or event.
//!
//! Each kind carries only the fields it needs. The persisted blob is the
//! JSON form of [`Session`], tagged by `kind`.

use crate::models::{Checkpoint, Coordinate, Participant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Which kind of session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    DailyChallenge,
    FriendChallenge,
    Event,
}

impl SessionKind {
    /// Path segment used by the API (`daily`, `friend`, `event`).
    pub fn api_segment(&self) -> &'static str {
        match self {
            SessionKind::DailyChallenge => "daily",
            SessionKind::FriendChallenge => "friend",
            SessionKind::Event => "event",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_segment())
    }
}

/// One active challenge or event participation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Session {
    DailyChallenge(DailyChallengeSession),
    FriendChallenge(FriendChallengeSession),
    Event(EventSession),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct DailyChallengeSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct FriendChallengeSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub target_steps: u64,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct EventSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub checkpoints: Vec<Checkpoint>,
    /// Checkpoints to place relative to the first observed location
    #[serde(default)]
    pub fixed_templates: Vec<FixedCheckpointTemplate>,
    /// Set once the fixed checkpoints have been placed
    #[serde(default)]
    pub fixed_origin: Option<Coordinate>,
}

/// A checkpoint positioned as an offset from the user's first fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[serde(rename_all = "camelCase")]
pub struct FixedCheckpointTemplate {
    pub name: String,
    pub north_m: f64,
    pub east_m: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub points: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub steps: u64,
}

impl Session {
    pub fn daily(id: impl Into<String>) -> Self {
        Session::DailyChallenge(DailyChallengeSession {
            id: id.into(),
            start_time: Utc::now(),
        })
    }

    pub fn friend(id: impl Into<String>, target_steps: u64, participants: Vec<Participant>) -> Self {
        Session::FriendChallenge(FriendChallengeSession {
            id: id.into(),
            start_time: Utc::now(),
            target_steps,
            participants,
        })
    }

    pub fn event(id: impl Into<String>, checkpoints: Vec<Checkpoint>) -> Self {
        Session::Event(EventSession {
            id: id.into(),
            start_time: Utc::now(),
            checkpoints,
            fixed_templates: Vec::new(),
            fixed_origin: None,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            Session::DailyChallenge(s) => &s.id,
            Session::FriendChallenge(s) => &s.id,
            Session::Event(s) => &s.id,
        }
    }

    pub fn kind(&self) -> SessionKind {
        match self {
            Session::DailyChallenge(_) => SessionKind::DailyChallenge,
            Session::FriendChallenge(_) => SessionKind::FriendChallenge,
            Session::Event(_) => SessionKind::Event,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Session::DailyChallenge(s) => s.start_time,
            Session::FriendChallenge(s) => s.start_time,
            Session::Event(s) => s.start_time,
        }
    }

    /// Event checkpoints; empty for other kinds.
    pub fn checkpoints(&self) -> &[Checkpoint] {
        match self {
            Session::Event(s) => &s.checkpoints,
            _ => &[],
        }
    }

    /// Friend-challenge participants; empty for other kinds.
    pub fn participants(&self) -> &[Participant] {
        match self {
            Session::FriendChallenge(s) => &s.participants,
            _ => &[],
        }
    }

    pub fn target_steps(&self) -> Option<u64> {
        match self {
            Session::FriendChallenge(s) => Some(s.target_steps),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_json_is_tagged_by_kind() {
        let session = Session::friend("fc-1", 5000, vec![Participant::new("u1", "Alice")]);
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["kind"], "friendChallenge");
        assert_eq!(json["targetSteps"], 5000);
        assert_eq!(json["participants"][0]["name"], "Alice");
    }

    #[test]
    fn test_event_without_fixed_fields_deserializes() {
        let json = r#"{
            "kind": "event",
            "id": "ev-9",
            "startTime": "2024-05-01T08:00:00Z",
            "checkpoints": []
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.kind(), SessionKind::Event);
        assert_eq!(session.id(), "ev-9");
        match session {
            Session::Event(ev) => {
                assert!(ev.fixed_templates.is_empty());
                assert!(ev.fixed_origin.is_none());
            }
            other => panic!("unexpected session {:?}", other),
        }
    }

    #[test]
    fn test_kind_accessors() {
        let daily = Session::daily("d-1");
        assert_eq!(daily.kind().api_segment(), "daily");
        assert!(daily.checkpoints().is_empty());
        assert!(daily.participants().is_empty());
        assert_eq!(daily.target_steps(), None);
    }
}
