//! Summary statistics computed over activity records.
//!
//! Aggregates are folded over the queried record set at request time;
//! nothing is cached or precomputed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{Activity, ActivityType};

/// Per-user activity summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Total activities logged
    pub total_activities: u32,
    /// Total duration across all activities (minutes)
    pub total_duration: u32,
    /// Total calories burned
    pub total_calories: i64,
    /// Total distance (km); activities without a distance contribute 0
    pub total_distance: f64,
    /// Most frequent activity type, if any activities exist
    pub favorite_activity: Option<ActivityType>,
}

impl ActivitySummary {
    /// Fold a set of activities into a summary.
    ///
    /// The favorite activity is the mode of `activity_type`; ties break by
    /// the canonical type name ascending, so the result is deterministic.
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut counts: HashMap<ActivityType, u32> = HashMap::new();
        let mut summary = Self {
            total_activities: 0,
            total_duration: 0,
            total_calories: 0,
            total_distance: 0.0,
            favorite_activity: None,
        };

        for activity in activities {
            summary.total_activities += 1;
            summary.total_duration += activity.duration_minutes;
            summary.total_calories += i64::from(activity.calories_burned);
            summary.total_distance += activity.distance_km.unwrap_or(0.0);
            *counts.entry(activity.activity_type).or_insert(0) += 1;
        }

        summary.favorite_activity = counts
            .into_iter()
            .max_by(|(a_type, a_count), (b_type, b_count)| {
                a_count
                    .cmp(b_count)
                    .then_with(|| b_type.as_str().cmp(a_type.as_str()))
            })
            .map(|(activity_type, _)| activity_type);

        summary
    }
}

/// Per-team summary across member activities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStats {
    pub team_name: String,
    pub total_members: u32,
    /// Total activities across all members
    pub total_activities: u32,
    /// Total calories across all members
    pub total_calories: i64,
    /// Average calories per member; 0.0 for an empty team
    pub average_calories_per_member: f64,
}

impl TeamStats {
    /// Compute team statistics from member activities.
    pub fn compute(team_name: &str, member_count: usize, activities: &[Activity]) -> Self {
        let total_calories: i64 = activities
            .iter()
            .map(|a| i64::from(a.calories_burned))
            .sum();

        // Guard against division by zero for empty teams
        let average_calories_per_member = if member_count == 0 {
            0.0
        } else {
            total_calories as f64 / member_count as f64
        };

        Self {
            team_name: team_name.to_string(),
            total_members: member_count as u32,
            total_activities: activities.len() as u32,
            total_calories,
            average_calories_per_member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_activity(activity_type: ActivityType, calories: u32, distance: Option<f64>) -> Activity {
        Activity {
            id: uuid::Uuid::new_v4().to_string(),
            activity_id: uuid::Uuid::new_v4().to_string(),
            user_id: "u1".to_string(),
            activity_type,
            duration_minutes: 30,
            calories_burned: calories,
            distance_km: distance,
            notes: String::new(),
            date_logged: "2024-01-15T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_summary_totals() {
        let activities = vec![
            make_activity(ActivityType::Running, 300, Some(5.0)),
            make_activity(ActivityType::Running, 250, Some(4.0)),
            make_activity(ActivityType::Yoga, 100, None),
        ];

        let summary = ActivitySummary::from_activities(&activities);

        assert_eq!(summary.total_activities, 3);
        assert_eq!(summary.total_duration, 90);
        assert_eq!(summary.total_calories, 650);
        assert_eq!(summary.total_distance, 9.0);
        assert_eq!(summary.favorite_activity, Some(ActivityType::Running));
    }

    #[test]
    fn test_summary_empty() {
        let summary = ActivitySummary::from_activities(&[]);

        assert_eq!(summary.total_activities, 0);
        assert_eq!(summary.total_distance, 0.0);
        assert!(summary.favorite_activity.is_none());
    }

    #[test]
    fn test_favorite_tie_breaks_alphabetically() {
        // One of each: cycling < running < yoga by canonical name
        let activities = vec![
            make_activity(ActivityType::Yoga, 100, None),
            make_activity(ActivityType::Running, 100, None),
            make_activity(ActivityType::Cycling, 100, None),
        ];

        let summary = ActivitySummary::from_activities(&activities);

        assert_eq!(summary.favorite_activity, Some(ActivityType::Cycling));
    }

    #[test]
    fn test_team_stats_zero_members_no_division() {
        let stats = TeamStats::compute("Empty Team", 0, &[]);

        assert_eq!(stats.total_members, 0);
        assert_eq!(stats.average_calories_per_member, 0.0);
    }

    #[test]
    fn test_team_stats_average() {
        let activities = vec![
            make_activity(ActivityType::Running, 300, None),
            make_activity(ActivityType::Cycling, 500, None),
        ];

        let stats = TeamStats::compute("Road Runners", 4, &activities);

        assert_eq!(stats.total_activities, 2);
        assert_eq!(stats.total_calories, 800);
        assert_eq!(stats.average_calories_per_member, 200.0);
    }
}
