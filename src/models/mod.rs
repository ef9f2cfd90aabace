// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the session tracker.

pub mod checkpoint;
pub mod leaderboard;
pub mod participant;
pub mod session;
pub mod user;

pub use checkpoint::{Checkpoint, Coordinate};
pub use leaderboard::LeaderboardEntry;
pub use participant::Participant;
pub use session::{
    DailyChallengeSession, EventSession, FixedCheckpointTemplate, FriendChallengeSession, Session,
    SessionKind,
};
pub use user::User;
