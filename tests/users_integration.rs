// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User API integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST).

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_user, send, send_json, unique_suffix};

#[tokio::test]
async fn test_create_and_retrieve_user_round_trip() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let suffix = unique_suffix();
    let username = format!("roundtrip_{}", suffix);
    let email = format!("roundtrip_{}@example.com", suffix);

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": username,
            "email": email,
            "password": "correct horse battery staple",
            "first_name": "Jamie",
            "last_name": "Rivera",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    // Server-assigned fields are present and well-formed
    let id = created["id"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(created["date_joined"].as_str().unwrap()).is_ok());
    assert_eq!(created["is_active"], true);

    // Round-trip: GET by id returns identical caller-supplied values
    let (status, fetched) = send_json(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], created["username"]);
    assert_eq!(fetched["email"], created["email"]);
    assert_eq!(fetched["first_name"], "Jamie");
    assert_eq!(fetched["last_name"], "Rivera");
    assert_eq!(fetched["date_joined"], created["date_joined"]);
}

#[tokio::test]
async fn test_password_never_in_responses() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "nopass").await;
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let id = user["id"].as_str().unwrap();
    let (_, fetched) = send_json(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert!(fetched.get("password").is_none());
    assert!(fetched.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_username_conflict() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "dupuser").await;
    let username = user["username"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": username,
            "email": format!("other_{}@example.com", unique_suffix()),
            "password": "long enough password",
            "first_name": "A",
            "last_name": "B",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "dupemail").await;
    let email = user["email"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "username": format!("other_{}", unique_suffix()),
            "email": email,
            "password": "long enough password",
            "first_name": "A",
            "last_name": "B",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_partial_update_via_patch() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "patch").await;
    let id = user["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/api/users/{}", id),
        Some(json!({"first_name": "Updated"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["first_name"], "Updated");
    // Untouched fields survive
    assert_eq!(updated["username"], user["username"]);
    assert_eq!(updated["email"], user["email"]);
}

#[tokio::test]
async fn test_get_unknown_user_not_found() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/users/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_delete_user_cascades() {
    require_emulator!();
    let app = common::create_emulator_app().await;

    let user = create_test_user(&app, "cascade").await;
    let user_id = user["id"].as_str().unwrap().to_string();
    let bystander = create_test_user(&app, "bystander").await;
    let bystander_id = bystander["id"].as_str().unwrap().to_string();

    // An activity owned by the user
    let (status, activity) = send_json(
        &app,
        "POST",
        "/api/activities",
        Some(json!({
            "user_id": user_id,
            "activity_type": "running",
            "duration_minutes": 30,
            "calories_burned": 300,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A team created by the user
    let (status, team) = send_json(
        &app,
        "POST",
        "/api/teams",
        Some(json!({
            "name": format!("Cascade Team {}", unique_suffix()),
            "description": "doomed",
            "created_by": user_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A team created by someone else, with the user as a member
    let (status, other_team) = send_json(
        &app,
        "POST",
        "/api/teams",
        Some(json!({
            "name": format!("Bystander Team {}", unique_suffix()),
            "description": "survives",
            "created_by": bystander_id,
            "members": [user_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A workout created by the user
    let (status, workout) = send_json(
        &app,
        "POST",
        "/api/workouts",
        Some(json!({
            "name": "Cascade Workout",
            "description": "doomed",
            "difficulty_level": "beginner",
            "duration_minutes": 20,
            "calories_target": 150,
            "created_by": user_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A completion of that workout by the user
    let (status, completion) = send_json(
        &app,
        "POST",
        "/api/user-workouts",
        Some(json!({
            "user_id": user_id,
            "workout_id": workout["id"],
            "actual_duration": 25,
            "calories_burned": 180,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A leaderboard entry for the user
    let (status, entry) = send_json(
        &app,
        "POST",
        "/api/leaderboard",
        Some(json!({
            "user_id": user_id,
            "total_points": 120,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Delete the user
    let response = send(&app, "DELETE", &format!("/api/users/{}", user_id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Everything the user owned is gone
    for uri in [
        format!("/api/users/{}", user_id),
        format!("/api/activities/{}", activity["id"].as_str().unwrap()),
        format!("/api/teams/{}", team["id"].as_str().unwrap()),
        format!("/api/workouts/{}", workout["id"].as_str().unwrap()),
        format!("/api/user-workouts/{}", completion["id"].as_str().unwrap()),
        format!("/api/leaderboard/{}", entry["id"].as_str().unwrap()),
    ] {
        let (status, _) = send_json(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "expected {} to be deleted", uri);
    }

    // The bystander's team survives, without the deleted member
    let (status, surviving) = send_json(
        &app,
        "GET",
        &format!("/api/teams/{}", other_team["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(surviving["member_count"], 0);
}
