// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard resource handlers.
//!
//! Entries are denormalized snapshots; the totals and rank change only
//! through explicit writes, never by recomputation from activities.

use crate::error::{AppError, Result};
use crate::models::LeaderboardEntry;
use crate::routes::teams::{expand_team, TeamResponse};
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
use std::sync::Arc;

const DEFAULT_TOP_LIMIT: u32 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/leaderboard",
            get(list_leaderboard).post(create_entry),
        )
        .route("/api/leaderboard/top_users", get(top_users))
        .route("/api/leaderboard/by_team", get(by_team))
        .route(
            "/api/leaderboard/{id}",
            get(get_entry)
                .put(update_entry)
                .patch(update_entry)
                .delete(delete_entry),
        )
}

// ─── Wire Types ──────────────────────────────────────────────

/// Leaderboard entry with user and team references expanded.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardResponse {
    pub id: String,
    pub leaderboard_id: String,
    pub user: UserResponse,
    pub team: Option<TeamResponse>,
    pub total_points: i64,
    pub total_activities: u32,
    pub total_calories: i64,
    pub total_distance: f64,
    pub rank: u32,
    pub last_updated: String,
}

/// Payload for creating an entry. Totals default to zero.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLeaderboardRequest {
    pub user_id: String,
    pub team_id: Option<String>,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub total_activities: u32,
    #[serde(default)]
    pub total_calories: i64,
    #[serde(default)]
    pub total_distance: f64,
    #[serde(default)]
    pub rank: u32,
}

/// Partial-update payload. `last_updated` is refreshed on every write.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLeaderboardRequest {
    pub team_id: Option<String>,
    pub total_points: Option<i64>,
    pub total_activities: Option<u32>,
    pub total_calories: Option<i64>,
    pub total_distance: Option<f64>,
    pub rank: Option<u32>,
}

#[derive(Deserialize)]
struct TopUsersQuery {
    limit: Option<u32>,
}

#[derive(Deserialize)]
struct ByTeamQuery {
    team_id: String,
}

/// Expand a stored entry into its wire representation.
async fn expand_entry(state: &AppState, entry: LeaderboardEntry) -> Result<LeaderboardResponse> {
    let user = state
        .db
        .get_user(&entry.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", entry.user_id)))?;

    let team = match &entry.team_id {
        Some(team_id) => {
            let team = state
                .db
                .get_team(team_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;
            Some(expand_team(state, team).await?)
        }
        None => None,
    };

    Ok(LeaderboardResponse {
        id: entry.id,
        leaderboard_id: entry.leaderboard_id,
        user: UserResponse::from(user),
        team,
        total_points: entry.total_points,
        total_activities: entry.total_activities,
        total_calories: entry.total_calories,
        total_distance: entry.total_distance,
        rank: entry.rank,
        last_updated: entry.last_updated,
    })
}

async fn expand_entries(
    state: &AppState,
    entries: Vec<LeaderboardEntry>,
) -> Result<Vec<LeaderboardResponse>> {
    let mut responses = Vec::with_capacity(entries.len());
    for entry in entries {
        responses.push(expand_entry(state, entry).await?);
    }
    Ok(responses)
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardResponse>>> {
    let entries = state.db.list_leaderboard().await?;
    Ok(Json(expand_entries(&state, entries).await?))
}

async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLeaderboardRequest>,
) -> Result<impl IntoResponse> {
    if state.db.get_user(&payload.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User {} not found",
            payload.user_id
        )));
    }
    if let Some(team_id) = &payload.team_id {
        if state.db.get_team(team_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Team {} not found", team_id)));
        }
    }

    let entry = LeaderboardEntry {
        id: uuid::Uuid::new_v4().to_string(),
        leaderboard_id: uuid::Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        team_id: payload.team_id,
        total_points: payload.total_points,
        total_activities: payload.total_activities,
        total_calories: payload.total_calories,
        total_distance: payload.total_distance,
        rank: payload.rank,
        last_updated: now_rfc3339(),
    };

    state.db.upsert_leaderboard_entry(&entry).await?;
    tracing::info!(
        entry_id = %entry.id,
        user_id = %entry.user_id,
        points = entry.total_points,
        "Leaderboard entry created"
    );

    let response = expand_entry(&state, entry).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LeaderboardResponse>> {
    let entry = state
        .db
        .get_leaderboard_entry(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leaderboard entry {} not found", id)))?;
    Ok(Json(expand_entry(&state, entry).await?))
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLeaderboardRequest>,
) -> Result<Json<LeaderboardResponse>> {
    let mut entry = state
        .db
        .get_leaderboard_entry(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Leaderboard entry {} not found", id)))?;

    if let Some(team_id) = payload.team_id {
        if state.db.get_team(&team_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Team {} not found", team_id)));
        }
        entry.team_id = Some(team_id);
    }
    if let Some(total_points) = payload.total_points {
        entry.total_points = total_points;
    }
    if let Some(total_activities) = payload.total_activities {
        entry.total_activities = total_activities;
    }
    if let Some(total_calories) = payload.total_calories {
        entry.total_calories = total_calories;
    }
    if let Some(total_distance) = payload.total_distance {
        entry.total_distance = total_distance;
    }
    if let Some(rank) = payload.rank {
        entry.rank = rank;
    }
    entry.last_updated = now_rfc3339();

    state.db.upsert_leaderboard_entry(&entry).await?;
    Ok(Json(expand_entry(&state, entry).await?))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_leaderboard_entry(&id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Leaderboard entry {} not found",
            id
        )));
    }

    state.db.delete_leaderboard_entry(&id).await?;
    tracing::info!(entry_id = %id, "Leaderboard entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Top entries by points. The sort and limit run in the query.
async fn top_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopUsersQuery>,
) -> Result<Json<Vec<LeaderboardResponse>>> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT);
    if limit == 0 {
        return Err(AppError::BadRequest(
            "Limit must be greater than 0".to_string(),
        ));
    }

    let entries = state.db.leaderboard_top(limit).await?;
    Ok(Json(expand_entries(&state, entries).await?))
}

/// Entries attributed to one team.
async fn by_team(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByTeamQuery>,
) -> Result<Json<Vec<LeaderboardResponse>>> {
    if state.db.get_team(&params.team_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Team {} not found",
            params.team_id
        )));
    }

    let entries = state.db.leaderboard_by_team(&params.team_id).await?;
    Ok(Json(expand_entries(&state, entries).await?))
}
