// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device sensor adapters.
//!
//! Sensors are exposed as cancellable streams. A subscription is lazy and
//! non-restartable: once cancelled or dropped it yields `None` forever and the
//! sensor side releases its handle on the next publish.

pub mod channel;
pub mod location;
pub mod pedometer;

pub use channel::{SensorHub, Subscription};
pub use location::{LocationFix, LocationSource, LocationWatch, SimulatedLocation};
pub use pedometer::{SensorReading, SimulatedPedometer, StepSensor, StepSubscription};

use serde::{Deserialize, Serialize};

/// Outcome of a runtime permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}
