// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity log resource handlers.

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityType};
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
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/by_type", get(activities_by_type))
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .put(update_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
}

// ─── Wire Types ──────────────────────────────────────────────

/// Activity representation with the owning user expanded.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub activity_id: String,
    pub user: UserResponse,
    pub activity_type: ActivityType,
    pub activity_type_display: &'static str,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    pub distance_km: Option<f64>,
    pub notes: String,
    pub date_logged: String,
}

impl ActivityResponse {
    pub fn new(activity: Activity, user: UserResponse) -> Self {
        Self {
            id: activity.id,
            activity_id: activity.activity_id,
            user,
            activity_type: activity.activity_type,
            activity_type_display: activity.activity_type.display_name(),
            duration_minutes: activity.duration_minutes,
            calories_burned: activity.calories_burned,
            distance_km: activity.distance_km,
            notes: activity.notes,
            date_logged: activity.date_logged,
        }
    }
}

/// Payload for logging an activity.
///
/// The external `activity_id` and `date_logged` are always server-assigned;
/// supplying them fails deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateActivityRequest {
    pub user_id: String,
    pub activity_type: ActivityType,
    #[validate(range(min = 1))]
    pub duration_minutes: u32,
    pub calories_burned: u32,
    #[validate(range(min = 0.0))]
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

/// Partial-update payload; the owner is immutable.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateActivityRequest {
    pub activity_type: Option<ActivityType>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<u32>,
    pub calories_burned: Option<u32>,
    #[validate(range(min = 0.0))]
    pub distance_km: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct ByTypeQuery {
    #[serde(rename = "type")]
    activity_type: String,
}

/// Expand a batch of activities, resolving owners with one read per
/// distinct user.
async fn expand_activities(
    state: &AppState,
    activities: Vec<Activity>,
) -> Result<Vec<ActivityResponse>> {
    let mut user_ids: Vec<String> = activities.iter().map(|a| a.user_id.clone()).collect();
    user_ids.sort();
    user_ids.dedup();

    let users = state.db.get_users_by_ids(&user_ids).await?;
    let by_id: HashMap<String, UserResponse> = users
        .into_iter()
        .map(|u| (u.id.clone(), UserResponse::from(u)))
        .collect();

    Ok(activities
        .into_iter()
        .filter_map(|a| {
            by_id
                .get(&a.user_id)
                .cloned()
                .map(|user| ActivityResponse::new(a, user))
        })
        .collect())
}

// ─── Handlers ────────────────────────────────────────────────

async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivityResponse>>> {
    let activities = state.db.list_activities().await?;
    Ok(Json(expand_activities(&state, activities).await?))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateActivityRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state
        .db
        .get_user(&payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", payload.user_id)))?;

    let activity = Activity {
        id: uuid::Uuid::new_v4().to_string(),
        activity_id: uuid::Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        activity_type: payload.activity_type,
        duration_minutes: payload.duration_minutes,
        calories_burned: payload.calories_burned,
        distance_km: payload.distance_km,
        notes: payload.notes.unwrap_or_default(),
        date_logged: now_rfc3339(),
    };

    state.db.upsert_activity(&activity).await?;
    tracing::info!(
        activity_id = %activity.id,
        user_id = %activity.user_id,
        activity_type = %activity.activity_type,
        "Activity logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse::new(activity, UserResponse::from(user))),
    ))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityResponse>> {
    let activity = state
        .db
        .get_activity(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))?;

    let user = state
        .db
        .get_user(&activity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", activity.user_id)))?;

    Ok(Json(ActivityResponse::new(
        activity,
        UserResponse::from(user),
    )))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityResponse>> {
    payload.validate()?;

    let mut activity = state
        .db
        .get_activity(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))?;

    if let Some(activity_type) = payload.activity_type {
        activity.activity_type = activity_type;
    }
    if let Some(duration_minutes) = payload.duration_minutes {
        activity.duration_minutes = duration_minutes;
    }
    if let Some(calories_burned) = payload.calories_burned {
        activity.calories_burned = calories_burned;
    }
    if let Some(distance_km) = payload.distance_km {
        activity.distance_km = Some(distance_km);
    }
    if let Some(notes) = payload.notes {
        activity.notes = notes;
    }

    state.db.upsert_activity(&activity).await?;

    let user = state
        .db
        .get_user(&activity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", activity.user_id)))?;

    Ok(Json(ActivityResponse::new(
        activity,
        UserResponse::from(user),
    )))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if state.db.get_activity(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Activity {} not found", id)));
    }

    state.db.delete_activity(&id).await?;
    tracing::info!(activity_id = %id, "Activity deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Filter activities by type.
async fn activities_by_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ByTypeQuery>,
) -> Result<Json<Vec<ActivityResponse>>> {
    let activity_type: ActivityType = params.activity_type.parse()?;
    let activities = state.db.activities_by_type(activity_type).await?;
    Ok(Json(expand_activities(&state, activities).await?))
}
