//! Leaderboard entry model for storage.

use serde::{Deserialize, Serialize};

/// Denormalized per-user ranking snapshot stored in Firestore.
///
/// Not derived from activity history; totals and rank change only through
/// explicit writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Server-generated UUID (also used as document ID)
    pub id: String,
    /// External leaderboard identifier (server-generated UUID, unique)
    pub leaderboard_id: String,
    /// User id this entry ranks
    pub user_id: String,
    /// Team id, if the entry is attributed to a team
    pub team_id: Option<String>,
    /// Total points
    pub total_points: i64,
    /// Total number of activities
    pub total_activities: u32,
    /// Total calories burned
    pub total_calories: i64,
    /// Total distance in kilometers
    pub total_distance: f64,
    /// Current rank
    pub rank: u32,
    /// When the entry was last written (RFC3339)
    pub last_updated: String,
}
