// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session Screen Controller.
//!
//! Orchestrates one active session: a one-second clock, the step sensor
//! subscription, and (for events) the location watch feeding checkpoint
//! proximity. All observations are folded into the [`SessionStore`].
//!
//! [`SessionStore`]: crate::services::SessionStore

pub mod session;
mod sync;

pub use session::SessionController;

use crate::config::Config;
use crate::models::{Checkpoint, LeaderboardEntry, Session};
use crate::services::geofence::{GeofenceRadii, Proximity};
use serde::Serialize;
use std::time::Duration;

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControllerStatus {
    #[default]
    Idle,
    Running,
    Ended,
}

/// Step sensor state as rendered by the session screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorStatus {
    #[default]
    Inactive,
    Active,
    Unavailable,
    PermissionDenied,
}

/// Checkpoint proximity feature state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GeofenceStatus {
    /// Not an event session
    #[default]
    NotApplicable,
    Active,
    /// Location permission was denied for this session
    Disabled,
}

/// Blocking dialog content for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControllerEvent {
    Alert(Alert),
    SensorUnavailable,
    CheckpointNearby { checkpoint: Checkpoint },
    CheckpointCaptured { checkpoint: Checkpoint, total_points: u64 },
    SessionEnded { summary: SessionSummary },
}

/// Everything the session screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSnapshot {
    pub status: ControllerStatus,
    pub sensor: SensorStatus,
    pub geofence: GeofenceStatus,
    pub proximity: Proximity,
    pub session: Option<Session>,
    pub steps: u64,
    pub points: u64,
    pub elapsed_secs: u64,
    /// `HH:MM:SS`
    pub elapsed_display: String,
}

/// Final record produced by `end()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session: Session,
    pub steps: u64,
    pub points: u64,
    pub elapsed_secs: u64,
    /// Friend challenges only
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
}

/// Result of a successful checkpoint capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOutcome {
    pub checkpoint: Checkpoint,
    pub points_awarded: u64,
    pub total_points: u64,
}

/// Controller tuning.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// One tick adds one second to the session clock
    pub tick_interval: Duration,
    pub radii: GeofenceRadii,
    /// Post step progress every N ticks; 0 disables periodic sync
    pub sync_every_ticks: u32,
    /// The signed-in user's participant ID in friend challenges
    pub self_participant_id: Option<String>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            radii: GeofenceRadii::default(),
            sync_every_ticks: 10,
            self_participant_id: None,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config, self_participant_id: Option<String>) -> Self {
        Self {
            tick_interval: config.tick_interval,
            radii: config.geofence_radii(),
            sync_every_ticks: config.sync_every_ticks,
            self_participant_id,
        }
    }
}
