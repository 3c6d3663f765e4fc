// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, uniqueness lookups)
//! - Teams (membership, creator queries)
//! - Activities (per-user and per-type queries)
//! - Leaderboard entries (ranking queries)
//! - Workouts and workout completions
//!
//! Cross-collection cascades (user/team/workout deletion) batch their
//! deletes through Firestore transactions.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    Activity, ActivityType, Difficulty, LeaderboardEntry, Team, User, UserWorkout, Workout,
};
use futures_util::{stream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;
// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Generic Document Helpers ────────────────────────────────

    /// Fetch a single document by id.
    async fn fetch_one<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a document keyed by id.
    async fn write_doc<T>(&self, collection: &str, id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a single document by id.
    async fn delete_doc(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.fetch_one(collections::USERS, user_id).await
    }

    /// List all users, most recently joined first.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .order_by([(
                "date_joined",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by exact username (uniqueness lookup).
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_string();
        let matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("username").eq(username.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.into_iter().next())
    }

    /// Find a user by exact email (uniqueness lookup).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.into_iter().next())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.write_doc(collections::USERS, &user.id, user).await
    }

    /// Fetch several users by id, preserving input order.
    ///
    /// Missing ids are skipped. Reads are bounded-concurrent.
    pub async fn get_users_by_ids(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        let results: Vec<Result<Option<User>, AppError>> = stream::iter(user_ids.to_vec())
            .map(|user_id| async move { self.fetch_one(collections::USERS, &user_id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut users = Vec::with_capacity(user_ids.len());
        for result in results {
            if let Some(user) = result? {
                users.push(user);
            }
        }
        Ok(users)
    }

    // ─── Team Operations ─────────────────────────────────────────

    /// Get a team by id.
    pub async fn get_team(&self, team_id: &str) -> Result<Option<Team>, AppError> {
        self.fetch_one(collections::TEAMS, team_id).await
    }

    /// List all teams, most recently created first.
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a team by exact name (uniqueness lookup).
    pub async fn find_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError> {
        let name = name.to_string();
        let matches: Vec<Team> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(move |q| q.field("name").eq(name.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(matches.into_iter().next())
    }

    /// List teams created by a user.
    pub async fn teams_created_by(&self, user_id: &str) -> Result<Vec<Team>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TEAMS)
            .filter(move |q| q.field("created_by").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a team.
    pub async fn upsert_team(&self, team: &Team) -> Result<(), AppError> {
        self.write_doc(collections::TEAMS, &team.id, team).await
    }

    /// Delete a team and cascade to leaderboard entries referencing it.
    pub async fn delete_team_cascade(&self, team_id: &str) -> Result<usize, AppError> {
        let entries = self.leaderboard_by_team(team_id).await?;
        let count = entries.len();
        self.batch_delete(&entries, collections::LEADERBOARD, |e: &LeaderboardEntry| {
            e.id.clone()
        })
        .await?;

        self.delete_doc(collections::TEAMS, team_id).await?;

        tracing::debug!(team_id, leaderboard_entries = count, "Deleted team");
        Ok(count + 1)
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Get an activity by id.
    pub async fn get_activity(&self, activity_id: &str) -> Result<Option<Activity>, AppError> {
        self.fetch_one(collections::ACTIVITIES, activity_id).await
    }

    /// List all activities, most recent first.
    pub async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .order_by([(
                "date_logged",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's activities, most recent first.
    pub async fn activities_for_user(&self, user_id: &str) -> Result<Vec<Activity>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "date_logged",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List activities of one type, most recent first.
    pub async fn activities_by_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Activity>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.field("activity_type").eq(activity_type.as_str()))
            .order_by([(
                "date_logged",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Activities for every member of a set of users (team stats).
    ///
    /// Reads are bounded-concurrent, one query per member.
    pub async fn activities_for_users(&self, user_ids: &[String]) -> Result<Vec<Activity>, AppError> {
        let results: Vec<Result<Vec<Activity>, AppError>> = stream::iter(user_ids.to_vec())
            .map(|user_id| async move { self.activities_for_user(&user_id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut activities = Vec::new();
        for result in results {
            activities.extend(result?);
        }
        Ok(activities)
    }

    /// Create or update an activity.
    pub async fn upsert_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.write_doc(collections::ACTIVITIES, &activity.id, activity)
            .await
    }

    /// Delete an activity.
    pub async fn delete_activity(&self, activity_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::ACTIVITIES, activity_id).await
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Get a leaderboard entry by id.
    pub async fn get_leaderboard_entry(
        &self,
        entry_id: &str,
    ) -> Result<Option<LeaderboardEntry>, AppError> {
        self.fetch_one(collections::LEADERBOARD, entry_id).await
    }

    /// List all leaderboard entries, highest points first.
    pub async fn list_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .order_by([(
                "total_points",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Top entries by points; sorting and limiting happen in the query.
    pub async fn leaderboard_top(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .order_by([(
                "total_points",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Entries attributed to one team.
    pub async fn leaderboard_by_team(
        &self,
        team_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let team_id = team_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .filter(move |q| q.field("team_id").eq(team_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Entries for one user.
    pub async fn leaderboard_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a leaderboard entry.
    pub async fn upsert_leaderboard_entry(
        &self,
        entry: &LeaderboardEntry,
    ) -> Result<(), AppError> {
        self.write_doc(collections::LEADERBOARD, &entry.id, entry)
            .await
    }

    /// Delete a leaderboard entry.
    pub async fn delete_leaderboard_entry(&self, entry_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::LEADERBOARD, entry_id).await
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Get a workout by id.
    pub async fn get_workout(&self, workout_id: &str) -> Result<Option<Workout>, AppError> {
        self.fetch_one(collections::WORKOUTS, workout_id).await
    }

    /// List all workouts, most recently created first.
    pub async fn list_workouts(&self) -> Result<Vec<Workout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Workouts at one difficulty level.
    pub async fn workouts_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<Workout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| q.field("difficulty_level").eq(difficulty.as_str()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Publicly visible workouts.
    pub async fn public_workouts(&self) -> Result<Vec<Workout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| q.field("is_public").eq(true))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Workouts created by a user.
    pub async fn workouts_created_by(&self, user_id: &str) -> Result<Vec<Workout>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| q.field("created_by").eq(user_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a workout.
    pub async fn upsert_workout(&self, workout: &Workout) -> Result<(), AppError> {
        self.write_doc(collections::WORKOUTS, &workout.id, workout)
            .await
    }

    /// Delete a workout and cascade to its completion records.
    pub async fn delete_workout_cascade(&self, workout_id: &str) -> Result<usize, AppError> {
        let completions = self.user_workouts_for_workout(workout_id).await?;
        let count = completions.len();
        self.batch_delete(
            &completions,
            collections::USER_WORKOUTS,
            |c: &UserWorkout| c.id.clone(),
        )
        .await?;

        self.delete_doc(collections::WORKOUTS, workout_id).await?;

        tracing::debug!(workout_id, completions = count, "Deleted workout");
        Ok(count + 1)
    }

    // ─── Workout Completion Operations ───────────────────────────

    /// Get a completion record by id.
    pub async fn get_user_workout(&self, record_id: &str) -> Result<Option<UserWorkout>, AppError> {
        self.fetch_one(collections::USER_WORKOUTS, record_id).await
    }

    /// List all completion records, most recent first.
    pub async fn list_user_workouts(&self) -> Result<Vec<UserWorkout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_WORKOUTS)
            .order_by([(
                "completed_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Completion records for one user, most recent first.
    pub async fn user_workouts_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<UserWorkout>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_WORKOUTS)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "completed_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Completion records for one workout plan.
    pub async fn user_workouts_for_workout(
        &self,
        workout_id: &str,
    ) -> Result<Vec<UserWorkout>, AppError> {
        let workout_id = workout_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USER_WORKOUTS)
            .filter(move |q| q.field("workout_id").eq(workout_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a completion record.
    pub async fn upsert_user_workout(&self, record: &UserWorkout) -> Result<(), AppError> {
        self.write_doc(collections::USER_WORKOUTS, &record.id, record)
            .await
    }

    /// Delete a completion record.
    pub async fn delete_user_workout(&self, record_id: &str) -> Result<(), AppError> {
        self.delete_doc(collections::USER_WORKOUTS, record_id).await
    }

    // ─── User Data Deletion (Cascade) ────────────────────────────

    /// Delete a user and everything that references them.
    ///
    /// Cascades, in order:
    /// - their activities
    /// - their workout completion records
    /// - their leaderboard entries
    /// - workouts they created (with those workouts' completion records)
    /// - teams they created (with those teams' leaderboard entries)
    /// - their membership in any remaining team
    /// - the user profile itself
    ///
    /// Returns the number of documents deleted.
    pub async fn delete_user_cascade(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Delete the user's activities
        let activities = self.activities_for_user(user_id).await?;
        let count = activities.len();
        self.batch_delete(&activities, collections::ACTIVITIES, |a: &Activity| {
            a.id.clone()
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted activities");

        // 2. Delete the user's completion records
        let completions = self.user_workouts_by_user(user_id).await?;
        let count = completions.len();
        self.batch_delete(
            &completions,
            collections::USER_WORKOUTS,
            |c: &UserWorkout| c.id.clone(),
        )
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted workout completions");

        // 3. Delete the user's leaderboard entries
        let entries = self.leaderboard_for_user(user_id).await?;
        let count = entries.len();
        self.batch_delete(&entries, collections::LEADERBOARD, |e: &LeaderboardEntry| {
            e.id.clone()
        })
        .await?;
        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted leaderboard entries");

        // 4. Delete workouts the user created, cascading to completions
        let workouts = self.workouts_created_by(user_id).await?;
        for workout in &workouts {
            deleted_count += self.delete_workout_cascade(&workout.id).await?;
        }
        tracing::debug!(user_id, count = workouts.len(), "Deleted created workouts");

        // 5. Delete teams the user created, cascading to leaderboard entries
        let teams = self.teams_created_by(user_id).await?;
        for team in &teams {
            deleted_count += self.delete_team_cascade(&team.id).await?;
        }
        tracing::debug!(user_id, count = teams.len(), "Deleted created teams");

        // 6. Remove the user from member lists of remaining teams.
        //    The query surface has no array-contains filter, so scan and
        //    rewrite only the teams that actually hold the user.
        let all_teams = self.list_teams().await?;
        for mut team in all_teams {
            if team.is_member(user_id) {
                team.members.retain(|m| m != user_id);
                self.upsert_team(&team).await?;
            }
        }

        // 7. Delete the user profile
        self.delete_doc(collections::USERS, user_id).await?;
        deleted_count += 1;
        tracing::debug!(user_id, "Deleted user profile");

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
