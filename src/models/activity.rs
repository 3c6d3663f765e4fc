// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged fitness activity model for storage.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Kind of fitness activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Running,
    Cycling,
    Swimming,
    Walking,
    Weightlifting,
    Yoga,
    Other,
}

impl ActivityType {
    /// Canonical string used on the wire and in Firestore documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::Walking => "walking",
            Self::Weightlifting => "weightlifting",
            Self::Yoga => "yoga",
            Self::Other => "other",
        }
    }

    /// Human-readable label for display.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
            Self::Swimming => "Swimming",
            Self::Walking => "Walking",
            Self::Weightlifting => "Weight Lifting",
            Self::Yoga => "Yoga",
            Self::Other => "Other",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "cycling" => Ok(Self::Cycling),
            "swimming" => Ok(Self::Swimming),
            "walking" => Ok(Self::Walking),
            "weightlifting" => Ok(Self::Weightlifting),
            "yoga" => Ok(Self::Yoga),
            "other" => Ok(Self::Other),
            _ => Err(AppError::BadRequest(format!(
                "Unknown activity type: {}",
                s
            ))),
        }
    }
}

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// External activity identifier (server-generated UUID, unique)
    pub activity_id: String,
    /// User id of the owner
    pub user_id: String,
    /// Kind of activity
    pub activity_type: ActivityType,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Calories burned
    pub calories_burned: u32,
    /// Distance in kilometers, if applicable
    pub distance_km: Option<f64>,
    /// Free-text notes
    pub notes: String,
    /// When the activity was logged (RFC3339)
    pub date_logged: String,
}
