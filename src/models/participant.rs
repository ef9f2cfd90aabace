// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A contributor to a friend challenge (self or friend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    #[serde(default)]
    pub steps: u64,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            steps: 0,
        }
    }

    /// Derived, never stored.
    pub fn goal_reached(&self, target_steps: u64) -> bool {
        self.steps >= target_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_reached_is_inclusive() {
        let mut p = Participant::new("u1", "Alice");
        p.steps = 9_999;
        assert!(!p.goal_reached(10_000));
        p.steps = 10_000;
        assert!(p.goal_reached(10_000));
    }
}
