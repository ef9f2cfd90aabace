// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and body-measurement form validation.
//!
//! Errors are keyed by field so the form can show them inline; any error
//! blocks submission.

use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Validate;

/// Field name to human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Sign-up form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Body measurements collected after sign-up (used for distance and
/// calorie estimates).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementForm {
    #[validate(range(min = 50.0, max = 260.0, message = "Height must be 50-260 cm"))]
    pub height_cm: f64,

    #[validate(range(min = 20.0, max = 400.0, message = "Weight must be 20-400 kg"))]
    pub weight_kg: f64,

    #[validate(range(min = 13, max = 120, message = "Age must be 13-120"))]
    pub age: Option<u32>,
}

/// Validate a form, collecting messages per field.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| {
        errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect()
    })
}
