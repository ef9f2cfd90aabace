// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client paths, headers, and error mapping against a mock server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stride_tracker::error::TrackerError;
use stride_tracker::models::SessionKind;
use stride_tracker::services::api::{
    DailyStepUpdate, EventStepUpdate, FriendStepUpdate, HttpProgressClient, ProgressApi,
};

#[tokio::test]
async fn test_daily_steps_posts_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/steps/daily/d-1"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({ "steps": 2500 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpProgressClient::new(server.uri(), "tok-123");
    client
        .post_daily_steps("d-1", &DailyStepUpdate { steps: 2500 })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_friend_and_event_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/steps/friend/fc-2"))
        .and(body_json(json!({ "steps": 10000, "completed": true, "goalReached": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/user/steps/event/ev-3"))
        .and(body_json(json!({ "steps": 40, "completed": false })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpProgressClient::new(format!("{}/", server.uri()), "tok");
    client
        .post_friend_steps(
            "fc-2",
            &FriendStepUpdate {
                steps: 10000,
                completed: true,
                goal_reached: true,
            },
        )
        .await
        .unwrap();
    client
        .post_event_steps(
            "ev-3",
            &EventStepUpdate {
                steps: 40,
                completed: false,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_participate_uses_kind_segment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/participate/event/ev-3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpProgressClient::new(server.uri(), "tok");
    client.participate(SessionKind::Event, "ev-3").await.unwrap();
}

#[tokio::test]
async fn test_friend_progress_parses_participants() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/user/challenges/friend/fc-2/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": [
                { "id": "bob", "name": "Bob", "steps": 4100 },
                { "userId": "cat", "steps": 20 }
            ]
        })))
        .mount(&server)
        .await;

    let client = HttpProgressClient::new(server.uri(), "tok");
    let progress = client.friend_progress("fc-2").await.unwrap();

    assert_eq!(progress.len(), 2);
    assert_eq!(progress[0].id, "bob");
    assert_eq!(progress[0].steps, 4100);
    assert_eq!(progress[1].id, "cat");
}

#[tokio::test]
async fn test_status_codes_map_to_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/user/steps/daily/limited"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/user/steps/daily/expired"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/user/steps/daily/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = HttpProgressClient::new(server.uri(), "tok");
    let update = DailyStepUpdate { steps: 1 };

    let err = client.post_daily_steps("limited", &update).await.unwrap_err();
    assert!(matches!(&err, TrackerError::Api(msg) if msg == TrackerError::API_RATE_LIMIT));
    assert!(err.is_retryable_api_error());

    let err = client.post_daily_steps("expired", &update).await.unwrap_err();
    assert!(matches!(&err, TrackerError::Api(msg) if msg == TrackerError::API_TOKEN_ERROR));
    assert!(!err.is_retryable_api_error());

    let err = client.post_daily_steps("broken", &update).await.unwrap_err();
    assert!(matches!(&err, TrackerError::Api(msg) if msg.starts_with("HTTP 500") && msg.contains("boom")));
    assert!(err.is_retryable_api_error());
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    // Nothing listens on port 1
    let client = HttpProgressClient::new("http://127.0.0.1:1", "tok");
    let err = client
        .participate(SessionKind::DailyChallenge, "d-1")
        .await
        .unwrap_err();
    assert!(matches!(&err, TrackerError::Api(msg) if msg.starts_with("Request failed")));
    assert!(err.is_retryable_api_error());
}
