// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event checkpoint loading from static GeoJSON data.

use crate::models::{Checkpoint, Coordinate};
use geo::Point;
use geojson::GeoJson;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// All known event checkpoints, loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct CheckpointCatalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    event_id: Option<String>,
    checkpoint: Checkpoint,
}

impl CheckpointCatalog {
    /// Load checkpoints from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load checkpoints from a GeoJSON FeatureCollection of Points.
    ///
    /// Recognised properties: `id` (required), `name`, `eventId`, `points`,
    /// `steps`, `approxDistance`.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| CatalogError::ParseError(e.to_string()))?;

        let mut entries = Vec::new();

        if let GeoJson::FeatureCollection(collection) = geojson {
            for feature in collection.features {
                // Skip features with no ID (can't be referenced by a session)
                let Some(id) = feature.property("id").and_then(id_string) else {
                    continue;
                };

                let name = feature
                    .property("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Checkpoint")
                    .to_string();
                let event_id = feature.property("eventId").and_then(id_string);
                let points = feature
                    .property("points")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                let steps = feature
                    .property("steps")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0);
                let approx_distance = feature
                    .property("approxDistance")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);

                let Some(geom) = feature.geometry else {
                    continue;
                };
                let point: Point<f64> = geom
                    .value
                    .try_into()
                    .map_err(|_| CatalogError::UnsupportedGeometry(id.clone()))?;
                let at = Coordinate::from(point);

                entries.push(CatalogEntry {
                    event_id,
                    checkpoint: Checkpoint {
                        id,
                        name,
                        latitude: at.latitude,
                        longitude: at.longitude,
                        points,
                        steps,
                        approx_distance,
                    },
                });
            }
        }

        tracing::info!(count = entries.len(), "Loaded checkpoints");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a checkpoint by ID.
    pub fn get(&self, id: &str) -> Option<&Checkpoint> {
        self.entries
            .iter()
            .map(|e| &e.checkpoint)
            .find(|c| c.id == id)
    }

    /// Checkpoints belonging to `event_id`, in file order.
    pub fn for_event(&self, event_id: &str) -> Vec<Checkpoint> {
        self.entries
            .iter()
            .filter(|e| e.event_id.as_deref() == Some(event_id))
            .map(|e| e.checkpoint.clone())
            .collect()
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Errors from checkpoint loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Checkpoint {0} is not a Point")]
    UnsupportedGeometry(String),
}
