// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity API integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST).

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_user, send_json};

async fn log_activity(
    app: &axum::Router,
    user_id: &str,
    activity_type: &str,
    calories: u32,
) -> serde_json::Value {
    let (status, activity) = send_json(
        app,
        "POST",
        "/api/activities",
        Some(json!({
            "user_id": user_id,
            "activity_type": activity_type,
            "duration_minutes": 30,
            "calories_burned": calories,
            "distance_km": 5.0,
            "notes": "logged from test",
        })),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "activity creation failed: {activity}"
    );
    activity
}

#[tokio::test]
async fn test_server_assigns_unique_activity_ids() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "actids").await;
    let user_id = user["id"].as_str().unwrap();

    let first = log_activity(&app, user_id, "running", 300).await;
    let second = log_activity(&app, user_id, "running", 300).await;

    let first_id = first["activity_id"].as_str().unwrap();
    let second_id = second["activity_id"].as_str().unwrap();

    assert!(uuid::Uuid::parse_str(first_id).is_ok());
    assert!(uuid::Uuid::parse_str(second_id).is_ok());
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_activity_round_trip_with_expanded_user() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "actround").await;
    let created = log_activity(&app, user["id"].as_str().unwrap(), "cycling", 400).await;

    let (status, fetched) = send_json(
        &app,
        "GET",
        &format!("/api/activities/{}", created["id"].as_str().unwrap()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["activity_type"], "cycling");
    assert_eq!(fetched["activity_type_display"], "Cycling");
    assert_eq!(fetched["duration_minutes"], 30);
    assert_eq!(fetched["calories_burned"], 400);
    assert_eq!(fetched["distance_km"], 5.0);
    assert_eq!(fetched["notes"], "logged from test");
    // The owning user expands to a nested representation
    assert_eq!(fetched["user"]["id"], user["id"]);
    assert_eq!(fetched["user"]["username"], user["username"]);
    assert!(fetched["user"].get("password").is_none());
}

#[tokio::test]
async fn test_user_activities_most_recent_first() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "actorder").await;
    let user_id = user["id"].as_str().unwrap();

    let first = log_activity(&app, user_id, "running", 100).await;
    // Log times have second precision; make sure the second activity lands later
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = log_activity(&app, user_id, "walking", 200).await;

    let (status, listed) = send_json(
        &app,
        "GET",
        &format!("/api/users/{}/activities", user_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], second["id"]);
    assert_eq!(listed[1]["id"], first["id"]);
}

#[tokio::test]
async fn test_activities_by_type_filter() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "acttype").await;
    let user_id = user["id"].as_str().unwrap();

    log_activity(&app, user_id, "yoga", 80).await;
    log_activity(&app, user_id, "running", 300).await;

    let (status, listed) = send_json(&app, "GET", "/api/activities/by_type?type=yoga", None).await;

    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert!(!listed.is_empty());
    assert!(listed.iter().all(|a| a["activity_type"] == "yoga"));
}

#[tokio::test]
async fn test_create_activity_unknown_user_not_found() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/activities",
        Some(json!({
            "user_id": uuid::Uuid::new_v4().to_string(),
            "activity_type": "running",
            "duration_minutes": 30,
            "calories_burned": 300,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_user_stats_summary() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "actstats").await;
    let user_id = user["id"].as_str().unwrap();

    log_activity(&app, user_id, "swimming", 250).await;
    log_activity(&app, user_id, "swimming", 350).await;
    log_activity(&app, user_id, "walking", 100).await;

    let (status, stats) = send_json(&app, "GET", &format!("/api/users/{}/stats", user_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_activities"], 3);
    assert_eq!(stats["total_duration"], 90);
    assert_eq!(stats["total_calories"], 700);
    assert_eq!(stats["total_distance"], 15.0);
    assert_eq!(stats["favorite_activity"], "swimming");
}

#[tokio::test]
async fn test_user_stats_empty() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "actempty").await;
    let (status, stats) = send_json(
        &app,
        "GET",
        &format!("/api/users/{}/stats", user["id"].as_str().unwrap()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_activities"], 0);
    assert_eq!(stats["favorite_activity"], serde_json::Value::Null);
}
