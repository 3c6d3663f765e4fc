// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan resource handlers.

use crate::error::{AppError, Result};
use crate::models::{Difficulty, Exercise, Workout};
use crate::routes::users::UserResponse;
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
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route("/api/workouts/by_difficulty", get(by_difficulty))
        .route("/api/workouts/public", get(public_workouts))
        .route(
            "/api/workouts/{id}",
            get(get_workout)
                .put(update_workout)
                .patch(update_workout)
                .delete(delete_workout),
        )
}

// ─── Wire Types ──────────────────────────────────────────────

/// Workout plan with the creator expanded.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutResponse {
    pub id: String,
    pub workout_id: String,
    pub name: String,
    pub description: String,
    pub difficulty_level: Difficulty,
    pub difficulty_level_display: &'static str,
    pub duration_minutes: u32,
    pub calories_target: u32,
    pub exercises: Vec<Exercise>,
    pub created_by: UserResponse,
    pub is_public: bool,
    pub created_at: String,
}

impl WorkoutResponse {
    pub fn new(workout: Workout, created_by: UserResponse) -> Self {
        Self {
            id: workout.id,
            workout_id: workout.workout_id,
            name: workout.name,
            description: workout.description,
            difficulty_level: workout.difficulty_level,
            difficulty_level_display: workout.difficulty_level.display_name(),
            duration_minutes: workout.duration_minutes,
            calories_target: workout.calories_target,
            exercises: workout.exercises,
            created_by,
            is_public: workout.is_public,
            created_at: workout.created_at,
        }
    }
}

/// Payload for creating a workout plan.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    pub difficulty_level: Difficulty,
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    pub calories_target: u32,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub created_by: String,
    pub is_public: Option<bool>,
}

/// Partial-update payload; the creator is immutable.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub difficulty_level: Option<Difficulty>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<u32>,
    pub calories_target: Option<u32>,
    pub exercises: Option<Vec<Exercise>>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
struct ByDifficultyQuery {
    difficulty: String,
}

/// Expand a batch of workouts, resolving creators with one read per
/// distinct user.
pub(crate) async fn expand_workouts(
    state: &AppState,
    workouts: Vec<Workout>,
) -> Result<Vec<WorkoutResponse>> {
    let mut user_ids: Vec<String> = workouts.iter().map(|w| w.created_by.clone()).collect();
    user_ids.sort();
    user_ids.dedup();

    let users = state.db.get_users_by_ids(&user_ids).await?;
    let by_id: HashMap<String, UserResponse> = users
        .into_iter()
        .map(|u| (u.id.clone(), UserResponse::from(u)))
        .collect();

    Ok(workouts
        .into_iter()
        .filter_map(|w| {
            by_id
                .get(&w.created_by)
                .cloned()
                .map(|creator| WorkoutResponse::new(w, creator))
        })
        .collect())
}

/// Expand a single workout.
pub(crate) async fn expand_workout(state: &AppState, workout: Workout) -> Result<WorkoutResponse> {
    let creator = state
        .db
        .get_user(&workout.created_by)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", workout.created_by)))?;
    Ok(WorkoutResponse::new(workout, UserResponse::from(creator)))
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_workouts(State(state): State<Arc<AppState>>) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = state.db.list_workouts().await?;
    Ok(Json(expand_workouts(&state, workouts).await?))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWorkoutRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let creator = state
        .db
        .get_user(&payload.created_by)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", payload.created_by)))?;

    let workout = Workout {
        id: uuid::Uuid::new_v4().to_string(),
        workout_id: uuid::Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        difficulty_level: payload.difficulty_level,
        duration_minutes: payload.duration_minutes,
        calories_target: payload.calories_target,
        exercises: payload.exercises,
        created_by: payload.created_by,
        is_public: payload.is_public.unwrap_or(true),
        created_at: now_rfc3339(),
    };

    state.db.upsert_workout(&workout).await?;
    tracing::info!(
        workout_id = %workout.id,
        name = %workout.name,
        difficulty = %workout.difficulty_level,
        "Workout created"
    );

    Ok((
        StatusCode::CREATED,
        Json(WorkoutResponse::new(workout, UserResponse::from(creator))),
    ))
}

async fn get_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutResponse>> {
    let workout = state
        .db
        .get_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))?;
    Ok(Json(expand_workout(&state, workout).await?))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateWorkoutRequest>,
) -> Result<Json<WorkoutResponse>> {
    payload.validate()?;

    let mut workout = state
        .db
        .get_workout(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Workout {} not found", id)))?;

    if let Some(name) = payload.name {
        workout.name = name;
    }
    if let Some(description) = payload.description {
        workout.description = description;
    }
    if let Some(difficulty_level) = payload.difficulty_level {
        workout.difficulty_level = difficulty_level;
    }
    if let Some(duration_minutes) = payload.duration_minutes {
        workout.duration_minutes = duration_minutes;
    }
    if let Some(calories_target) = payload.calories_target {
        workout.calories_target = calories_target;
    }
    if let Some(exercises) = payload.exercises {
        workout.exercises = exercises;
    }
    if let Some(is_public) = payload.is_public {
        workout.is_public = is_public;
    }

    state.db.upsert_workout(&workout).await?;
    Ok(Json(expand_workout(&state, workout).await?))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_workout(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Workout {} not found", id)));
    }

    let deleted = state.db.delete_workout_cascade(&id).await?;
    tracing::info!(workout_id = %id, deleted, "Workout deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Filter workouts by difficulty level.
async fn by_difficulty(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByDifficultyQuery>,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let difficulty: Difficulty = params.difficulty.parse()?;
    let workouts = state.db.workouts_by_difficulty(difficulty).await?;
    Ok(Json(expand_workouts(&state, workouts).await?))
}

/// Publicly visible workouts only.
async fn public_workouts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = state.db.public_workouts().await?;
    Ok(Json(expand_workouts(&state, workouts).await?))
}
