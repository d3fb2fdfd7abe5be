use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::config::DatabaseSettings;
use crate::models::enums::weekday_from_code;
use crate::models::{
    Activity, ActivityCategory, Coordinates, FitnessGoal, FitnessLevel, GenderPreference, MatchStatus,
    MatchingPreference, Profile, ProfileActivity, ProfileGoal, ProfileSchedule, TimeSlot,
};
use crate::services::repository::{MatchRepository, ProfileRepository, RepositoryError};

const PROFILE_COLUMNS: &str = r#"
    id, user_id, first_name, last_name, display_name, date_of_birth, bio,
    profile_picture_url, latitude, longitude, fitness_level, has_home_gym
"#;

/// PostgreSQL reader for the profile and match tables
///
/// The tables belong to the account and profile services; this client only
/// ever issues SELECTs against them.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, RepositoryError> {
        tracing::info!(
            max_connections = settings.max_connections.unwrap_or(10),
            "Connecting to PostgreSQL"
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn load_preference(&self, profile_id: i32) -> Result<Option<MatchingPreference>, RepositoryError> {
        let query = r#"
            SELECT max_distance_miles, min_age, max_age, gender_preference,
                   prefer_similar_fitness_level, fitness_level_tolerance,
                   prefer_home_gym, prefer_public_gym, prefer_outdoor,
                   open_to_group_workouts, max_group_size
            FROM matching_preferences
            WHERE profile_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(preference_from_row).transpose()
    }

    /// Fill activities, goals and schedules for a batch of profiles
    async fn attach_relations(&self, profiles: &mut [Profile]) -> Result<(), RepositoryError> {
        if profiles.is_empty() {
            return Ok(());
        }

        let ids: Vec<i32> = profiles.iter().map(|p| p.id).collect();

        let activity_rows = sqlx::query(
            r#"
            SELECT pa.profile_id, pa.is_primary,
                   a.id, a.name, a.category, a.description, a.icon_url, a.is_active
            FROM profile_activities pa
            JOIN activities a ON a.id = pa.activity_id
            WHERE pa.profile_id = ANY($1)
            ORDER BY pa.profile_id, pa.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let goal_rows = sqlx::query(
            r#"
            SELECT profile_id, goal, priority
            FROM profile_goals
            WHERE profile_id = ANY($1)
            ORDER BY profile_id, priority
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let schedule_rows = sqlx::query(
            r#"
            SELECT profile_id, day_of_week, time_slot, is_available
            FROM profile_schedules
            WHERE profile_id = ANY($1)
            ORDER BY profile_id, day_of_week, time_slot
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut activities: HashMap<i32, Vec<ProfileActivity>> = HashMap::new();
        for row in &activity_rows {
            let profile_id: i32 = row.try_get("profile_id")?;
            activities
                .entry(profile_id)
                .or_default()
                .push(profile_activity_from_row(row)?);
        }

        let mut goals: HashMap<i32, Vec<ProfileGoal>> = HashMap::new();
        for row in &goal_rows {
            let profile_id: i32 = row.try_get("profile_id")?;
            goals.entry(profile_id).or_default().push(ProfileGoal {
                goal: FitnessGoal::try_from(row.try_get::<i32, _>("goal")?)?,
                priority: row.try_get("priority")?,
            });
        }

        let mut schedules: HashMap<i32, Vec<ProfileSchedule>> = HashMap::new();
        for row in &schedule_rows {
            let profile_id: i32 = row.try_get("profile_id")?;
            schedules.entry(profile_id).or_default().push(ProfileSchedule {
                day_of_week: weekday_from_code(row.try_get("day_of_week")?)?,
                time_slot: TimeSlot::try_from(row.try_get::<i32, _>("time_slot")?)?,
                is_available: row.try_get("is_available")?,
            });
        }

        for profile in profiles.iter_mut() {
            profile.activities = activities.remove(&profile.id).unwrap_or_default();
            profile.goals = goals.remove(&profile.id).unwrap_or_default();
            profile.schedules = schedules.remove(&profile.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for PostgresClient {
    async fn get_profile_with_relations(&self, user_id: i32) -> Result<Option<Profile>, RepositoryError> {
        let query = format!(
            "SELECT {} FROM profiles WHERE user_id = $1 ORDER BY id LIMIT 1",
            PROFILE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            tracing::debug!(user_id, "No profile row for user");
            return Ok(None);
        };

        let mut profiles = vec![profile_from_row(&row)?];
        self.attach_relations(&mut profiles).await?;

        let mut profile = profiles.remove(0);
        profile.matching_preference = self.load_preference(profile.id).await?;

        Ok(Some(profile))
    }

    async fn list_candidate_profiles(
        &self,
        exclude_profile_id: i32,
        exclude_profile_ids: &HashSet<i32>,
    ) -> Result<Vec<Profile>, RepositoryError> {
        let query = format!(
            r#"
            SELECT {}
            FROM profiles
            WHERE id <> $1
              AND NOT (id = ANY($2))
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
            ORDER BY id
            "#,
            PROFILE_COLUMNS
        );

        let excluded: Vec<i32> = exclude_profile_ids.iter().copied().collect();

        let rows = sqlx::query(&query)
            .bind(exclude_profile_id)
            .bind(&excluded)
            .fetch_all(&self.pool)
            .await?;

        let mut profiles = rows
            .iter()
            .map(profile_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        self.attach_relations(&mut profiles).await?;

        tracing::debug!(
            exclude_profile_id,
            excluded = excluded.len(),
            loaded = profiles.len(),
            "Loaded candidate profiles"
        );

        Ok(profiles)
    }
}

#[async_trait]
impl MatchRepository for PostgresClient {
    async fn list_non_excluded_match_partner_ids(&self, profile_id: i32) -> Result<HashSet<i32>, RepositoryError> {
        let query = r#"
            SELECT DISTINCT
                CASE WHEN requester_id = $1 THEN requestee_id ELSE requester_id END AS partner_id
            FROM matches
            WHERE (requester_id = $1 OR requestee_id = $1)
              AND NOT (status = ANY($2))
        "#;

        let rows = sqlx::query(query)
            .bind(profile_id)
            .bind(status_codes(&MatchStatus::TERMINAL))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<i32, _>("partner_id").map_err(Into::into))
            .collect()
    }

    async fn match_exists(
        &self,
        profile_a: i32,
        profile_b: i32,
        excluded_statuses: &[MatchStatus],
    ) -> Result<bool, RepositoryError> {
        let query = r#"
            SELECT EXISTS (
                SELECT 1
                FROM matches
                WHERE ((requester_id = $1 AND requestee_id = $2)
                    OR (requester_id = $2 AND requestee_id = $1))
                  AND NOT (status = ANY($3))
            ) AS found
        "#;

        let row = sqlx::query(query)
            .bind(profile_a)
            .bind(profile_b)
            .bind(status_codes(excluded_statuses))
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("found")?)
    }
}

fn status_codes(statuses: &[MatchStatus]) -> Vec<i32> {
    statuses.iter().map(|s| s.code()).collect()
}

fn profile_from_row(row: &PgRow) -> Result<Profile, RepositoryError> {
    Ok(Profile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        display_name: row.try_get("display_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        bio: row.try_get("bio")?,
        profile_picture_url: row.try_get("profile_picture_url")?,
        location: Coordinates::from_parts(row.try_get("latitude")?, row.try_get("longitude")?),
        fitness_level: FitnessLevel::try_from(row.try_get::<i32, _>("fitness_level")?)?,
        has_home_gym: row.try_get("has_home_gym")?,
        activities: Vec::new(),
        goals: Vec::new(),
        schedules: Vec::new(),
        matching_preference: None,
    })
}

fn profile_activity_from_row(row: &PgRow) -> Result<ProfileActivity, RepositoryError> {
    Ok(ProfileActivity {
        activity: Activity {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: ActivityCategory::try_from(row.try_get::<i32, _>("category")?)?,
            description: row.try_get("description")?,
            icon_url: row.try_get("icon_url")?,
            is_active: row.try_get("is_active")?,
        },
        is_primary: row.try_get("is_primary")?,
    })
}

fn preference_from_row(row: &PgRow) -> Result<MatchingPreference, RepositoryError> {
    let max_distance: i32 = row.try_get("max_distance_miles")?;
    let max_distance_miles = u32::try_from(max_distance)
        .map_err(|_| RepositoryError::InvalidData(format!("negative max distance: {}", max_distance)))?;

    Ok(MatchingPreference {
        max_distance_miles,
        min_age: row.try_get("min_age")?,
        max_age: row.try_get("max_age")?,
        gender_preference: GenderPreference::try_from(row.try_get::<i32, _>("gender_preference")?)?,
        prefer_similar_fitness_level: row.try_get("prefer_similar_fitness_level")?,
        fitness_level_tolerance: row.try_get("fitness_level_tolerance")?,
        prefer_home_gym: row.try_get("prefer_home_gym")?,
        prefer_public_gym: row.try_get("prefer_public_gym")?,
        prefer_outdoor: row.try_get("prefer_outdoor")?,
        open_to_group_workouts: row.try_get("open_to_group_workouts")?,
        max_group_size: row.try_get("max_group_size")?,
    })
}
