use super::Database;
use crate::models::{CreateUser, UpdateUser, UpdateUserProfile, User, UserProfile};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use sqlx::types::Json;
use tracing::{info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "user_id, email, username, password_hash, first_name, last_name, \
    date_of_birth, gender, height_cm, weight_kg, fitness_level, activity_level, \
    preferred_workout_duration, available_equipment, fitness_goals, dietary_restrictions, \
    last_workout_date, workout_streak, longest_streak, profile_visibility, created_utc, updated_utc";

impl Database {
    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user. A duplicate email (case-insensitive) is a conflict.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: &CreateUser) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO users (user_id, email, username, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.email.trim())
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(&self.pool)
            .await;

        timer.observe_duration();

        match result {
            Ok(user) => {
                info!(user_id = %user.user_id, "User created");
                Ok(user)
            }
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => Err(
                AppError::Conflict(anyhow::anyhow!("A user with this email already exists")),
            ),
            Err(e) => Err(AppError::DatabaseError(anyhow::anyhow!(
                "Failed to create user: {}",
                e
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_user"])
            .start_timer();

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get user: {}", e)))?;

        timer.observe_duration();
        Ok(user)
    }

    #[instrument(skip(self, email))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_user_by_email"])
            .start_timer();

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get user by email: {}", e))
            })?;

        timer.observe_duration();
        Ok(user)
    }

    /// Partial update; absent fields keep their stored value.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        input: &UpdateUser,
    ) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_user"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                date_of_birth = COALESCE($5, date_of_birth),
                gender = COALESCE($6, gender),
                height_cm = COALESCE($7, height_cm),
                weight_kg = COALESCE($8, weight_kg),
                fitness_level = COALESCE($9, fitness_level),
                activity_level = COALESCE($10, activity_level),
                preferred_workout_duration = COALESCE($11, preferred_workout_duration),
                available_equipment = COALESCE($12, available_equipment),
                dietary_restrictions = COALESCE($13, dietary_restrictions),
                profile_visibility = COALESCE($14, profile_visibility),
                updated_utc = NOW()
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.date_of_birth)
            .bind(input.gender.map(|g| g.as_str()))
            .bind(input.height_cm)
            .bind(input.weight_kg)
            .bind(input.fitness_level.map(|l| l.as_str()))
            .bind(input.activity_level.map(|l| l.as_str()))
            .bind(input.preferred_workout_duration)
            .bind(input.equipment_csv())
            .bind(&input.dietary_restrictions)
            .bind(input.profile_visibility.map(|v| v.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update user: {}", e)))?;

        timer.observe_duration();
        Ok(user)
    }

    /// Replace the fitness goals list.
    #[instrument(skip(self, goals), fields(count = goals.len()))]
    pub async fn set_fitness_goals(
        &self,
        user_id: Uuid,
        goals: &[String],
    ) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["set_fitness_goals"])
            .start_timer();

        let sql = format!(
            "UPDATE users SET fitness_goals = $2, updated_utc = NOW() WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(Json(goals))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to set fitness goals: {}", e))
            })?;

        timer.observe_duration();
        Ok(user)
    }

    // =========================================================================
    // Auth tokens
    // =========================================================================

    #[instrument(skip(self, token_hash))]
    pub async fn create_auth_token(&self, user_id: Uuid, token_hash: &str) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_auth_token"])
            .start_timer();

        sqlx::query("INSERT INTO auth_tokens (token_hash, user_id) VALUES ($1, $2)")
            .bind(token_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create auth token: {}", e))
            })?;

        timer.observe_duration();
        Ok(())
    }

    /// Resolve a token hash to its user, refreshing `last_used_utc`.
    #[instrument(skip(self, token_hash))]
    pub async fn authenticate_token(&self, token_hash: &str) -> Result<Option<Uuid>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["authenticate_token"])
            .start_timer();

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE auth_tokens
            SET last_used_utc = NOW()
            WHERE token_hash = $1
            RETURNING user_id
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to authenticate token: {}", e))
        })?;

        timer.observe_duration();
        Ok(user_id)
    }

    #[instrument(skip(self, token_hash))]
    pub async fn delete_auth_token(&self, token_hash: &str) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_auth_token"])
            .start_timer();

        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete auth token: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Profile details
    // =========================================================================

    /// Profile details row, created with defaults on first access.
    #[instrument(skip(self))]
    pub async fn get_or_create_profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_or_create_profile"])
            .start_timer();

        sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create profile: {}", e))
            })?;

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, bio, location, timezone, email_notifications, push_notifications,
                   workout_reminders, is_coach, coach_certification, created_utc, updated_utc
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get profile: {}", e)))?;

        timer.observe_duration();
        Ok(profile)
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: &UpdateUserProfile,
    ) -> Result<UserProfile, AppError> {
        // Make sure the row exists before updating it
        self.get_or_create_profile(user_id).await?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_profile"])
            .start_timer();

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET bio = COALESCE($2, bio),
                location = COALESCE($3, location),
                timezone = COALESCE($4, timezone),
                email_notifications = COALESCE($5, email_notifications),
                push_notifications = COALESCE($6, push_notifications),
                workout_reminders = COALESCE($7, workout_reminders),
                is_coach = COALESCE($8, is_coach),
                coach_certification = COALESCE($9, coach_certification),
                updated_utc = NOW()
            WHERE user_id = $1
            RETURNING user_id, bio, location, timezone, email_notifications, push_notifications,
                      workout_reminders, is_coach, coach_certification, created_utc, updated_utc
            "#,
        )
        .bind(user_id)
        .bind(&input.bio)
        .bind(&input.location)
        .bind(&input.timezone)
        .bind(input.email_notifications)
        .bind(input.push_notifications)
        .bind(input.workout_reminders)
        .bind(input.is_coach)
        .bind(&input.coach_certification)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update profile: {}", e)))?;

        timer.observe_duration();
        Ok(profile)
    }
}
