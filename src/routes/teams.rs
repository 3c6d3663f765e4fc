// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team resource handlers: CRUD plus join/leave/stats actions.

use crate::error::{AppError, Result};
use crate::models::{Team, TeamStats};
use crate::routes::users::UserResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/{id}",
            get(get_team)
                .put(update_team)
                .patch(update_team)
                .delete(delete_team),
        )
        .route("/api/teams/{id}/join", post(join_team))
        .route("/api/teams/{id}/leave", post(leave_team))
        .route("/api/teams/{id}/stats", get(team_stats))
}

// ─── Wire Types ──────────────────────────────────────────────

/// Team representation with expanded member and creator references.
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: UserResponse,
    pub members: Vec<UserResponse>,
    pub member_count: u32,
    pub created_at: String,
}

/// Payload for creating a team.
///
/// The creator is explicit; there is no ambient "current user".
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub members: Option<Vec<String>>,
}

/// Partial-update payload; membership changes go through join/leave.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body for the join/leave actions.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MembershipRequest {
    pub user_id: String,
}

/// Expand a stored team into its wire representation.
pub(crate) async fn expand_team(state: &AppState, team: Team) -> Result<TeamResponse> {
    let creator = state
        .db
        .get_user(&team.created_by)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", team.created_by)))?;

    let members = state.db.get_users_by_ids(&team.members).await?;
    let member_responses: Vec<UserResponse> =
        members.into_iter().map(UserResponse::from).collect();

    Ok(TeamResponse {
        id: team.id,
        name: team.name,
        description: team.description,
        created_by: UserResponse::from(creator),
        member_count: member_responses.len() as u32,
        members: member_responses,
        created_at: team.created_at,
    })
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_teams(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TeamResponse>>> {
    let teams = state.db.list_teams().await?;

    let mut responses = Vec::with_capacity(teams.len());
    for team in teams {
        responses.push(expand_team(&state, team).await?);
    }
    Ok(Json(responses))
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if state
        .db
        .get_user(&payload.created_by)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            payload.created_by
        )));
    }

    if state.db.find_team_by_name(&payload.name).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Team name '{}' is already taken",
            payload.name
        )));
    }

    // Initial members, deduplicated; each must exist
    let mut members = payload.members.unwrap_or_default();
    members.sort();
    members.dedup();
    for member_id in &members {
        if state.db.get_user(member_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", member_id)));
        }
    }

    let team = Team {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        created_by: payload.created_by,
        members,
        created_at: now_rfc3339(),
    };

    state.db.upsert_team(&team).await?;
    tracing::info!(team_id = %team.id, name = %team.name, "Team created");

    let response = expand_team(&state, team).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamResponse>> {
    let team = state
        .db
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;
    Ok(Json(expand_team(&state, team).await?))
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>> {
    payload.validate()?;

    let mut team = state
        .db
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

    if let Some(name) = payload.name {
        if name != team.name {
            if state.db.find_team_by_name(&name).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "Team name '{}' is already taken",
                    name
                )));
            }
            team.name = name;
        }
    }
    if let Some(description) = payload.description {
        team.description = description;
    }

    state.db.upsert_team(&team).await?;
    Ok(Json(expand_team(&state, team).await?))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_team(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Team {} not found", id)));
    }

    let deleted = state.db.delete_team_cascade(&id).await?;
    tracing::info!(team_id = %id, deleted, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Add a user to the team. Adding an existing member is a no-op.
async fn join_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<MembershipRequest>,
) -> Result<Json<TeamResponse>> {
    let mut team = state
        .db
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

    if state.db.get_user(&payload.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            payload.user_id
        )));
    }

    if !team.is_member(&payload.user_id) {
        team.members.push(payload.user_id.clone());
        state.db.upsert_team(&team).await?;
        tracing::info!(team_id = %id, user_id = %payload.user_id, "User joined team");
    }

    Ok(Json(expand_team(&state, team).await?))
}

/// Remove a user from the team. Leaving a team the user is not a member
/// of is an explicit error.
async fn leave_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<MembershipRequest>,
) -> Result<Json<TeamResponse>> {
    let mut team = state
        .db
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

    if state.db.get_user(&payload.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            payload.user_id
        )));
    }

    if !team.is_member(&payload.user_id) {
        return Err(AppError::BadRequest(format!(
            "User {} is not a member of this team",
            payload.user_id
        )));
    }

    team.members.retain(|m| m != &payload.user_id);
    state.db.upsert_team(&team).await?;
    tracing::info!(team_id = %id, user_id = %payload.user_id, "User left team");

    Ok(Json(expand_team(&state, team).await?))
}

/// Aggregate statistics across the team's members.
async fn team_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamStats>> {
    let team = state
        .db
        .get_team(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;

    let activities = state.db.activities_for_users(&team.members).await?;
    let stats = TeamStats::compute(&team.name, team.members.len(), &activities);

    Ok(Json(stats))
}
