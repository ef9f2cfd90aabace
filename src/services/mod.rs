// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session logic and collaborator adapters.

pub mod account;
pub mod api;
pub mod checkpoints;
pub mod geofence;
pub mod leaderboard;
pub mod session_store;

pub use account::AccountStore;
pub use api::{HttpProgressClient, ProgressApi};
pub use checkpoints::CheckpointCatalog;
pub use geofence::{GeofenceRadii, Proximity};
pub use leaderboard::rank_participants;
pub use session_store::{EventMountPolicy, SessionSnapshot, SessionStore};
