// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use exercise_tracker::clock::FixedClock;
use exercise_tracker::config::Config;
use exercise_tracker::db::{FirestoreStore, InMemoryStore, UserStore};
use exercise_tracker::routes::create_router;
use exercise_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// The instant returned by the test clock.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap()
}

/// Create a Firestore store connected to the emulator.
#[allow(dead_code)]
pub async fn test_firestore() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by the given store and a fixed clock.
#[allow(dead_code)]
pub fn create_app_with_store(store: Arc<dyn UserStore>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::default(),
        store,
        clock: Arc::new(FixedClock(test_now())),
    });

    (create_router(state.clone()), state)
}

/// Create a test app with an empty in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_app_with_store(Arc::new(InMemoryStore::new()))
}

/// Send a request and decode the JSON response.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body should be JSON")
    };
    (status, body)
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Register a user through the API and return its ID.
#[allow(dead_code)]
pub async fn register(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        post_json("/api/users", serde_json::json!({ "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration failed: {body}");
    body["_id"].as_str().unwrap().to_string()
}

/// Log an exercise through the API, asserting success.
#[allow(dead_code)]
pub async fn log_exercise(app: &Router, user_id: &str, description: &str, date: &str) {
    let (status, body) = send(
        app,
        post_json(
            &format!("/api/users/{user_id}/exercises"),
            serde_json::json!({ "description": description, "duration": 30, "date": date }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "exercise failed: {body}");
}
