// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkpoint proximity detection.
//!
//! Distances are great-circle (haversine) on a sphere of radius
//! [`EARTH_RADIUS_M`]. Inputs are degrees.

use crate::models::{Checkpoint, Coordinate, FixedCheckpointTemplate};
use geo::Point;
use serde::Serialize;

/// Mean Earth radius used for all proximity checks.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two points (x = lon, y = lat).
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = (b.y() - a.y()).to_radians();
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Return a checkpoint within `radius_m` of `point`, if any.
///
/// When several qualify the first in iteration order wins; there is no
/// tie-break by distance.
pub fn nearest_checkpoint_within(
    point: Point<f64>,
    checkpoints: &[Checkpoint],
    radius_m: f64,
) -> Option<&Checkpoint> {
    checkpoints
        .iter()
        .find(|c| haversine_distance(point, c.coordinate().point()) <= radius_m)
}

/// The two independent proximity thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceRadii {
    /// Checkpoint is "nearby" and may be captured
    pub activation_m: f64,
    /// Checkpoint is reachable and shown as actionable on the map
    pub interaction_m: f64,
}

impl Default for GeofenceRadii {
    fn default() -> Self {
        Self {
            activation_m: 30.0,
            interaction_m: 200.0,
        }
    }
}

/// Result of evaluating one location against an event's checkpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proximity {
    pub nearby: Option<Checkpoint>,
    pub reachable: Option<Checkpoint>,
}

impl GeofenceRadii {
    pub fn evaluate(&self, position: Coordinate, checkpoints: &[Checkpoint]) -> Proximity {
        let point = position.point();
        Proximity {
            nearby: nearest_checkpoint_within(point, checkpoints, self.activation_m).cloned(),
            reachable: nearest_checkpoint_within(point, checkpoints, self.interaction_m).cloned(),
        }
    }
}

/// Move `origin` by the given offsets in meters.
pub fn offset_coordinate(origin: Coordinate, north_m: f64, east_m: f64) -> Coordinate {
    let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
    let dlon = (east_m / (EARTH_RADIUS_M * origin.latitude.to_radians().cos())).to_degrees();
    Coordinate::new(origin.latitude + dlat, origin.longitude + dlon)
}

/// Place fixed checkpoints relative to the first observed location.
pub fn materialize_fixed_checkpoints(
    event_id: &str,
    origin: Coordinate,
    templates: &[FixedCheckpointTemplate],
) -> Vec<Checkpoint> {
    templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let at = offset_coordinate(origin, t.north_m, t.east_m);
            Checkpoint {
                id: format!("{}-fixed-{}", event_id, i + 1),
                name: t.name.clone(),
                latitude: at.latitude,
                longitude: at.longitude,
                points: t.points,
                steps: t.steps,
                approx_distance: haversine_distance(origin.point(), at.point()).round(),
            }
        })
        .collect()
}
