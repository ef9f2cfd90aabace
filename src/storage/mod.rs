// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-device key-value storage.
//!
//! Every value is a string: counters are decimal text, objects are JSON.
//! Keys are written independently; there is no transaction spanning keys.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use async_trait::async_trait;

/// String-keyed get/set/delete.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Storage key names as constants.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    /// JSON-serialized active session
    pub const ACTIVE_SESSION: &str = "activeSession";
    pub const SESSION_STEPS: &str = "sessionSteps";
    pub const SESSION_ELAPSED: &str = "sessionElapsed";
    pub const SESSION_POINTS: &str = "sessionPoints";

    /// All keys owned by the session store.
    pub const SESSION_KEYS: [&str; 4] = [
        ACTIVE_SESSION,
        SESSION_STEPS,
        SESSION_ELAPSED,
        SESSION_POINTS,
    ];
}
