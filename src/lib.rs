// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stride: session tracking for a step-challenge fitness app
//!
//! This crate provides the client-side core behind the active-challenge
//! screens: step sensor streaming, checkpoint geofencing, the persisted
//! session state store, and the controller that ties them together.

pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod sensors;
pub mod services;
pub mod storage;
pub mod time_utils;
pub mod validation;

use config::Config;
use controller::{ControllerSettings, SessionController};
use error::{Result, TrackerError};
use sensors::{LocationSource, StepSensor};
use services::{AccountStore, CheckpointCatalog, HttpProgressClient, ProgressApi, SessionStore};
use std::sync::Arc;
use storage::KeyValueStore;

/// Application shell: owns the long-lived state that session screens share.
///
/// Created once by `init` and torn down by `dispose`; nothing in the crate is
/// a global singleton.
pub struct AppShell {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub account: AccountStore,
    pub store: Arc<SessionStore>,
    pub catalog: CheckpointCatalog,
}

impl AppShell {
    /// Mount the session store and load static checkpoint data.
    ///
    /// A missing or unreadable checkpoint file leaves the catalog empty.
    pub async fn init(config: Config, storage: Arc<dyn KeyValueStore>) -> Self {
        let catalog = match CheckpointCatalog::load_from_file(&config.checkpoints_path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    path = %config.checkpoints_path.display(),
                    error = %e,
                    "Checkpoint data unavailable"
                );
                CheckpointCatalog::default()
            }
        };

        let store =
            Arc::new(SessionStore::init(storage.clone(), config.event_mount_policy).await);

        Self {
            account: AccountStore::new(storage.clone()),
            config,
            storage,
            store,
            catalog,
        }
    }

    /// HTTP client authenticated with the configured or stored token.
    pub async fn api_client(&self) -> Result<HttpProgressClient> {
        let token = match &self.config.api_token {
            Some(token) => Some(token.clone()),
            None => self.account.token().await?,
        };
        let token =
            token.ok_or_else(|| TrackerError::Api(TrackerError::API_TOKEN_ERROR.to_string()))?;
        Ok(HttpProgressClient::new(&self.config.api_base_url, token))
    }

    /// Build a controller for a session screen.
    pub async fn controller(
        &self,
        api: Arc<dyn ProgressApi>,
        pedometer: Arc<dyn StepSensor>,
        location: Arc<dyn LocationSource>,
    ) -> SessionController {
        let self_id = match self.account.user().await {
            Ok(user) => user.map(|u| u.id),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored user");
                None
            }
        };
        SessionController::new(
            self.store.clone(),
            api,
            pedometer,
            location,
            ControllerSettings::from_config(&self.config, self_id),
        )
    }

    /// Tear down a controller and drop in-memory session state.
    ///
    /// Persisted state is left in place for the next `init`.
    pub async fn dispose(&self, controller: Option<&SessionController>) {
        if let Some(controller) = controller {
            controller.dispose().await;
        }
        self.store.dispose().await;
        tracing::info!("App shell disposed");
    }
}
