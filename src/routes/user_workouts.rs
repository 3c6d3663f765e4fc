// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout completion resource handlers.

use crate::error::{AppError, Result};
use crate::models::UserWorkout;
use crate::routes::users::UserResponse;
use crate::routes::workouts::{expand_workout, WorkoutResponse};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/user-workouts",
            get(list_user_workouts).post(create_user_workout),
        )
        .route("/api/user-workouts/by_user", get(by_user))
        .route(
            "/api/user-workouts/{id}",
            get(get_user_workout)
                .put(update_user_workout)
                .patch(update_user_workout)
                .delete(delete_user_workout),
        )
}

// ─── Wire Types ──────────────────────────────────────────────

/// Completion record with user and workout expanded.
#[derive(Debug, Clone, Serialize)]
pub struct UserWorkoutResponse {
    pub id: String,
    pub user: UserResponse,
    pub workout: WorkoutResponse,
    pub completed_at: String,
    pub actual_duration: u32,
    pub calories_burned: u32,
    pub rating: Option<u8>,
    pub notes: String,
}

/// Payload for recording a completed workout.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserWorkoutRequest {
    pub user_id: String,
    pub workout_id: String,
    #[validate(range(min = 1))]
    pub actual_duration: u32,
    pub calories_burned: u32,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

/// Partial-update payload; the user and workout references are immutable.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserWorkoutRequest {
    #[validate(range(min = 1))]
    pub actual_duration: Option<u32>,
    pub calories_burned: Option<u32>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct ByUserQuery {
    user_id: String,
}

/// Expand a stored completion record into its wire representation.
async fn expand_record(state: &AppState, record: UserWorkout) -> Result<UserWorkoutResponse> {
    let user = state
        .db
        .get_user(&record.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", record.user_id)))?;

    let workout = state
        .db
        .get_workout(&record.workout_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", record.workout_id)))?;

    Ok(UserWorkoutResponse {
        id: record.id,
        user: UserResponse::from(user),
        workout: expand_workout(state, workout).await?,
        completed_at: record.completed_at,
        actual_duration: record.actual_duration,
        calories_burned: record.calories_burned,
        rating: record.rating,
        notes: record.notes,
    })
}

async fn expand_records(
    state: &AppState,
    records: Vec<UserWorkout>,
) -> Result<Vec<UserWorkoutResponse>> {
    let mut responses = Vec::with_capacity(records.len());
    for record in records {
        responses.push(expand_record(state, record).await?);
    }
    Ok(responses)
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_user_workouts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserWorkoutResponse>>> {
    let records = state.db.list_user_workouts().await?;
    Ok(Json(expand_records(&state, records).await?))
}

async fn create_user_workout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserWorkoutRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if state.db.get_user(&payload.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            payload.user_id
        )));
    }
    if state.db.get_workout(&payload.workout_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Workout {} not found",
            payload.workout_id
        )));
    }

    let record = UserWorkout {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        workout_id: payload.workout_id,
        completed_at: now_rfc3339(),
        actual_duration: payload.actual_duration,
        calories_burned: payload.calories_burned,
        rating: payload.rating,
        notes: payload.notes.unwrap_or_default(),
    };

    state.db.upsert_user_workout(&record).await?;
    tracing::info!(
        record_id = %record.id,
        user_id = %record.user_id,
        workout_id = %record.workout_id,
        "Workout completion recorded"
    );

    let response = expand_record(&state, record).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_user_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserWorkoutResponse>> {
    let record = state
        .db
        .get_user_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout completion {} not found", id)))?;
    Ok(Json(expand_record(&state, record).await?))
}

async fn update_user_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserWorkoutRequest>,
) -> Result<Json<UserWorkoutResponse>> {
    payload.validate()?;

    let mut record = state
        .db
        .get_user_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout completion {} not found", id)))?;

    if let Some(actual_duration) = payload.actual_duration {
        record.actual_duration = actual_duration;
    }
    if let Some(calories_burned) = payload.calories_burned {
        record.calories_burned = calories_burned;
    }
    if let Some(rating) = payload.rating {
        record.rating = Some(rating);
    }
    if let Some(notes) = payload.notes {
        record.notes = notes;
    }

    state.db.upsert_user_workout(&record).await?;
    Ok(Json(expand_record(&state, record).await?))
}

async fn delete_user_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_user_workout(&id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Workout completion {} not found",
            id
        )));
    }

    state.db.delete_user_workout(&id).await?;
    tracing::info!(record_id = %id, "Workout completion deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Completion records for one user, most recent first.
async fn by_user(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByUserQuery>,
) -> Result<Json<Vec<UserWorkoutResponse>>> {
    if state.db.get_user(&params.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            params.user_id
        )));
    }

    let records = state.db.user_workouts_by_user(&params.user_id).await?;
    Ok(Json(expand_records(&state, records).await?))
}
