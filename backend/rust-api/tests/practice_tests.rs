use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{bearer_token, create_test_app, get_json, post_json};
use prepmate_api::models::Difficulty;

#[tokio::test]
async fn single_candidate_is_served_deterministically() {
    let test = create_test_app();
    let token = bearer_token("alice");

    // only course-schedule matches graph/Medium in the seeded bank
    let (status, body) = get_json(
        &test.app,
        "/api/v1/practice/problem?topic=graph&difficulty=Medium",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Course Schedule");
    assert_eq!(body["slug"], "course-schedule");
    assert_eq!(body["difficulty"], "Medium");
    assert_eq!(body["url"], "https://leetcode.com/problems/course-schedule/");
}

#[tokio::test]
async fn missing_parameters_are_a_bad_request() {
    let test = create_test_app();
    let token = bearer_token("bob");

    let (status, body) = get_json(&test.app, "/api/v1/practice/problem?topic=graph", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing topic or difficulty");

    let (status, _) = get_json(
        &test.app,
        "/api/v1/practice/problem?difficulty=Easy",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmatched_filters_return_not_found() {
    let test = create_test_app();
    let token = bearer_token("carol");

    let (status, body) = get_json(
        &test.app,
        "/api/v1/practice/problem?topic=graph&difficulty=Hard",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No question found");
}

#[tokio::test]
async fn unknown_topic_slug_returns_not_found() {
    let test = create_test_app();
    let token = bearer_token("grace");

    let (status, body) = get_json(
        &test.app,
        "/api/v1/practice/problem?topic=quantum-computing&difficulty=Easy",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No question found");
}

#[tokio::test]
async fn tracked_attempt_is_stored_under_the_token_user() {
    let test = create_test_app();
    let token = bearer_token("dave");

    let (status, body) = post_json(
        &test.app,
        "/api/v1/practice/attempts",
        &token,
        json!({
            "topic": "graph",
            "difficulty": "Medium",
            "time_spent": 840,
            "completed": true,
            "hints_used": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let stored = test.attempts.coding_attempts();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].username, "dave");
    assert_eq!(stored[0].topic, "graph");
    assert_eq!(stored[0].difficulty, Difficulty::Medium);
    assert_eq!(stored[0].time_spent, 840);
    assert!(stored[0].completed);
    assert_eq!(stored[0].hints_used, 1);
}

#[tokio::test]
async fn negative_time_spent_is_rejected() {
    let test = create_test_app();
    let token = bearer_token("erin");

    let (status, _) = post_json(
        &test.app,
        "/api/v1/practice/attempts",
        &token,
        json!({
            "topic": "array",
            "difficulty": "Easy",
            "time_spent": -5,
            "completed": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(test.attempts.coding_attempts().is_empty());
}

#[tokio::test]
async fn malformed_body_is_rejected_with_a_json_error() {
    let test = create_test_app();
    let token = bearer_token("heidi");

    let response = test
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/practice/attempts")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let message = body["error"].as_str().expect("JSON error body");
    assert!(message.starts_with("Invalid request body"));
    assert!(test.attempts.coding_attempts().is_empty());
}

#[tokio::test]
async fn empty_payload_falls_back_to_defaults() {
    let test = create_test_app();
    let token = bearer_token("frank");

    let (status, _) = post_json(&test.app, "/api/v1/practice/attempts", &token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);

    let stored = test.attempts.coding_attempts();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].topic, "unknown");
    assert_eq!(stored[0].difficulty, Difficulty::Easy);
    assert_eq!(stored[0].time_spent, 0);
    assert!(!stored[0].completed);
    assert_eq!(stored[0].hints_used, 0);
}
