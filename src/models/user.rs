//! User model persisted on device.

use serde::{Deserialize, Serialize};

/// Signed-in user profile, stored as JSON under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-side user ID
    pub id: String,
    pub username: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Lifetime points balance, spent in the rewards store
    #[serde(default)]
    pub points: u64,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
}
