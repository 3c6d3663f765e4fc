// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan model for storage.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Difficulty level of a workout plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(AppError::BadRequest(format!(
                "Unknown difficulty level: {}",
                s
            ))),
        }
    }
}

/// One exercise in a workout plan.
///
/// Exercises come in two shapes: timed (e.g. plank, jump rope) and
/// set/rep based (e.g. push-ups). The tag keeps the two distinguishable
/// on the wire and in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exercise {
    Timed { name: String, duration_minutes: u32 },
    Strength { name: String, sets: u32, reps: u32 },
}

impl Exercise {
    pub fn name(&self) -> &str {
        match self {
            Self::Timed { name, .. } => name,
            Self::Strength { name, .. } => name,
        }
    }
}

/// Reusable workout plan stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// External workout identifier (server-generated UUID, unique)
    pub workout_id: String,
    /// Plan name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Difficulty level
    pub difficulty_level: Difficulty,
    /// Target duration in minutes
    pub duration_minutes: u32,
    /// Target calories
    pub calories_target: u32,
    /// Exercise list
    pub exercises: Vec<Exercise>,
    /// User id of the creator
    pub created_by: String,
    /// Whether the plan is visible to everyone
    pub is_public: bool,
    /// When the plan was created (RFC3339)
    pub created_at: String,
}
