// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User resource handlers.

use crate::error::{AppError, Result};
use crate::models::{ActivitySummary, User};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
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
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/api/users/{id}/activities", get(user_activities))
        .route("/api/users/{id}/stats", get(user_stats))
}

// ─── Wire Types ──────────────────────────────────────────────

/// User representation returned by the API.
///
/// The password (and its stored hash) never appears here.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.date_joined,
            is_active: user.is_active,
        }
    }
}

/// Payload for creating a user.
///
/// `deny_unknown_fields` rejects caller-supplied server-assigned fields
/// (`id`, `date_joined`) at deserialization time.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(length(max = 50))]
    pub first_name: String,
    #[validate(length(max = 50))]
    pub last_name: String,
    pub is_active: Option<bool>,
}

/// Partial-update payload; only supplied fields change.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if state
        .db
        .find_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            payload.username
        )));
    }
    if state.db.find_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Email '{}' is already registered",
            payload.email
        )));
    }

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username: payload.username,
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        date_joined: now_rfc3339(),
        is_active: payload.is_active.unwrap_or(true),
    };

    state.db.upsert_user(&user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(UserResponse::from(user)))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    payload.validate()?;

    let mut user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    if let Some(username) = payload.username {
        if username != user.username {
            if state.db.find_user_by_username(&username).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Username '{}' is already taken",
                    username
                )));
            }
            user.username = username;
        }
    }
    if let Some(email) = payload.email {
        if email != user.email {
            if state.db.find_user_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Email '{}' is already registered",
                    email
                )));
            }
            user.email = email;
        }
    }
    if let Some(password) = payload.password {
        user.password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
    }
    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(is_active) = payload.is_active {
        user.is_active = is_active;
    }

    state.db.upsert_user(&user).await?;
    Ok(Json(UserResponse::from(user)))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_user(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    let deleted = state.db.delete_user_cascade(&id).await?;
    tracing::info!(user_id = %id, deleted, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List one user's activities, most recent first.
async fn user_activities(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<super::activities::ActivityResponse>>> {
    let user = state
        .db
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    let activities = state.db.activities_for_user(&id).await?;
    let user_response = UserResponse::from(user);
    let responses = activities
        .into_iter()
        .map(|a| super::activities::ActivityResponse::new(a, user_response.clone()))
        .collect();

    Ok(Json(responses))
}

/// Aggregate summary for one user's activities.
async fn user_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivitySummary>> {
    if state.db.get_user(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    let activities = state.db.activities_for_user(&id).await?;
    Ok(Json(ActivitySummary::from_activities(&activities)))
}
