// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracker configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development. Numeric values that fail
//! to parse fall back to their defaults rather than aborting startup.

use crate::services::geofence::GeofenceRadii;
use crate::services::session_store::EventMountPolicy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Tracker configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the step-challenge API (no trailing `/v1`)
    pub api_base_url: String,
    /// Bearer token; when absent the token stored on device is used
    pub api_token: Option<String>,
    /// Directory backing the on-device key-value store
    pub storage_dir: PathBuf,
    /// Checkpoint "nearby" radius in meters (eligible for capture)
    pub activation_radius_m: f64,
    /// Checkpoint "reachable" radius in meters (visible on the map)
    pub interaction_radius_m: f64,
    /// Session clock tick
    pub tick_interval: Duration,
    /// Post a step update every N ticks
    pub sync_every_ticks: u32,
    /// What to do with a persisted Event session on mount
    pub event_mount_policy: EventMountPolicy,
    /// GeoJSON file with event checkpoints
    pub checkpoints_path: PathBuf,
}

const DEFAULT_ACTIVATION_RADIUS_M: f64 = 30.0;
const DEFAULT_INTERACTION_RADIUS_M: f64 = 200.0;
const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_SYNC_EVERY_TICKS: u32 = 10;

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            api_token: None,
            storage_dir: PathBuf::from(".stride"),
            activation_radius_m: DEFAULT_ACTIVATION_RADIUS_M,
            interaction_radius_m: DEFAULT_INTERACTION_RADIUS_M,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            sync_every_ticks: DEFAULT_SYNC_EVERY_TICKS,
            event_mount_policy: EventMountPolicy::ClearOnMount,
            checkpoints_path: PathBuf::from("data/event_checkpoints.geojson"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let event_mount_policy = match env::var("STRIDE_EVENT_MOUNT_POLICY") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("STRIDE_EVENT_MOUNT_POLICY", value))?,
            Err(_) => EventMountPolicy::ClearOnMount,
        };

        Ok(Self {
            api_base_url: env::var("STRIDE_API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("STRIDE_API_BASE_URL"))?,
            api_token: env::var("STRIDE_API_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            storage_dir: env::var("STRIDE_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".stride")),
            activation_radius_m: parse_or("STRIDE_ACTIVATION_RADIUS_M", DEFAULT_ACTIVATION_RADIUS_M),
            interaction_radius_m: parse_or(
                "STRIDE_INTERACTION_RADIUS_M",
                DEFAULT_INTERACTION_RADIUS_M,
            ),
            tick_interval: Duration::from_millis(parse_or(
                "STRIDE_TICK_INTERVAL_MS",
                DEFAULT_TICK_INTERVAL_MS,
            )),
            sync_every_ticks: parse_or("STRIDE_SYNC_EVERY_TICKS", DEFAULT_SYNC_EVERY_TICKS),
            event_mount_policy,
            checkpoints_path: env::var("STRIDE_CHECKPOINTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/event_checkpoints.geojson")),
        })
    }

    /// Geofence radii derived from this config.
    pub fn geofence_radii(&self) -> GeofenceRadii {
        GeofenceRadii {
            activation_m: self.activation_radius_m,
            interaction_m: self.interaction_radius_m,
        }
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
