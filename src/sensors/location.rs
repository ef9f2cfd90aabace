// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geolocation adapter.

use crate::models::Coordinate;
use crate::sensors::{PermissionStatus, SensorHub, Subscription};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single position update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

/// Stream of position updates.
pub type LocationWatch = Subscription<LocationFix>;

/// Device location service.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Prompt for foreground location permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// Start watching the position.
    async fn watch(&self) -> LocationWatch;
}

/// Location service driven by test code or a replay script.
pub struct SimulatedLocation {
    permission: PermissionStatus,
    hub: SensorHub<LocationFix>,
}

impl Default for SimulatedLocation {
    fn default() -> Self {
        Self::with_permission(PermissionStatus::Granted)
    }
}

impl SimulatedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permission(permission: PermissionStatus) -> Self {
        Self {
            permission,
            hub: SensorHub::new(),
        }
    }

    /// Report a new position to every watcher.
    pub fn move_to(&self, latitude: f64, longitude: f64) -> usize {
        self.hub.publish(LocationFix {
            coordinate: Coordinate::new(latitude, longitude),
            timestamp: Utc::now(),
        })
    }

    pub fn active_watches(&self) -> usize {
        self.hub.active()
    }
}

#[async_trait]
impl LocationSource for SimulatedLocation {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn watch(&self) -> LocationWatch {
        if !self.permission.is_granted() {
            return Subscription::closed();
        }
        self.hub.subscribe()
    }
}
