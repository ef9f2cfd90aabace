// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in account persistence (bearer token and user profile).

use crate::error::Result;
use crate::models::User;
use crate::storage::{keys, KeyValueStore};
use std::sync::Arc;

/// Reads and writes the `token` and `user` keys.
#[derive(Clone)]
pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(keys::TOKEN)
            .await?
            .filter(|t| !t.is_empty()))
    }

    pub async fn save_token(&self, token: &str) -> Result<()> {
        self.storage.set(keys::TOKEN, token).await
    }

    /// The stored user, or `None` if absent or unreadable.
    pub async fn user(&self) -> Result<Option<User>> {
        let Some(blob) = self.storage.get(keys::USER).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&blob) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored user");
                Ok(None)
            }
        }
    }

    pub async fn save_user(&self, user: &User) -> Result<()> {
        let blob = serde_json::to_string(user)?;
        self.storage.set(keys::USER, &blob).await
    }

    /// Remove credentials, profile, and any in-progress session state.
    pub async fn sign_out(&self) -> Result<()> {
        self.storage.delete(keys::TOKEN).await?;
        self.storage.delete(keys::USER).await?;
        for key in keys::SESSION_KEYS {
            self.storage.delete(key).await?;
        }
        tracing::info!("Signed out");
        Ok(())
    }
}
