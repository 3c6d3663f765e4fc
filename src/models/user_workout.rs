//! Workout completion model for storage.

use serde::{Deserialize, Serialize};

/// Record of one user completing one workout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWorkout {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// User id of the completing user
    pub user_id: String,
    /// Workout id of the completed plan
    pub workout_id: String,
    /// When the workout was completed (RFC3339)
    pub completed_at: String,
    /// Actual time taken in minutes
    pub actual_duration: u32,
    /// Calories burned
    pub calories_burned: u32,
    /// Optional 1-5 star rating
    pub rating: Option<u8>,
    /// Free-text notes
    pub notes: String,
}
