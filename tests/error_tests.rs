// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use stride_tracker::error::TrackerError;

#[test]
fn test_is_retryable_api_error_matches() {
    let err = TrackerError::Api(TrackerError::API_RATE_LIMIT.to_string());
    assert!(err.is_retryable_api_error());

    let err = TrackerError::Api("HTTP 502 Bad Gateway: upstream".to_string());
    assert!(err.is_retryable_api_error());

    let err = TrackerError::Api("Request failed: connection refused".to_string());
    assert!(err.is_retryable_api_error());
}

#[test]
fn test_is_retryable_api_error_no_match() {
    let err = TrackerError::Api(TrackerError::API_TOKEN_ERROR.to_string());
    assert!(!err.is_retryable_api_error());

    let err = TrackerError::Api("HTTP 404 Not Found: no such challenge".to_string());
    assert!(!err.is_retryable_api_error());

    let err = TrackerError::Storage("HTTP 500".to_string());
    assert!(!err.is_retryable_api_error());
}

#[test]
fn test_is_permission_denied() {
    assert!(TrackerError::PermissionDenied("location").is_permission_denied());
    assert!(!TrackerError::SensorUnavailable.is_permission_denied());
}

#[test]
fn test_serde_errors_convert() {
    let parse = serde_json::from_str::<u64>("not a number").unwrap_err();
    let err: TrackerError = parse.into();
    assert!(matches!(err, TrackerError::Serialization(_)));
}

#[test]
fn test_display_messages() {
    assert_eq!(TrackerError::NoActiveSession.to_string(), "No active session");
    assert_eq!(
        TrackerError::Api("HTTP 418".to_string()).to_string(),
        "API error: HTTP 418"
    );
}
