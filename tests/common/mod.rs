// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use campusfit::config::Config;
use campusfit::db::FirestoreDb;
use campusfit::routes::create_router;
use campusfit::AppState;
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

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let config = Config::test_default();
    let db = test_db_offline();
    let state = Arc::new(AppState { config, db });
    create_router(state)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> axum::Router {
    let config = Config::test_default();
    let db = test_db().await;
    let state = Arc::new(AppState { config, db });
    create_router(state)
}

/// Send a request with an optional JSON body and return the response.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and parse the response body as JSON.
///
/// Panics if the response body is not valid JSON.
#[allow(dead_code)]
pub async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let response = send(app, method, uri, body).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Unique suffix for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

/// Create a user through the API and return its JSON representation.
#[allow(dead_code)]
pub async fn create_test_user(app: &axum::Router, tag: &str) -> serde_json::Value {
    let suffix = unique_suffix();
    let (status, user) = send_json(
        app,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "username": format!("{}_{}", tag, suffix),
            "email": format!("{}_{}@example.com", tag, suffix),
            "password": "correct horse battery staple",
            "first_name": "Test",
            "last_name": "User",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "user creation failed: {user}");
    user
}
