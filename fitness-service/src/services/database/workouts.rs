use super::Database;
use crate::models::{
    next_streak, CompleteWorkout, CreateWorkoutTemplate, Difficulty, Exercise, ListExercisesFilter,
    ListTemplatesFilter, ListWorkoutsFilter, NewWorkout, UpdateWorkout, UpdateWorkoutTemplate,
    Workout, WorkoutTemplate,
};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use service_core::error::AppError;
use sqlx::FromRow;
use tracing::{info, instrument};
use uuid::Uuid;

const TEMPLATE_COLUMNS: &str = "template_id, name, description, workout_type, difficulty, \
    estimated_duration, intensity_level, equipment_needed, space_required, created_by, is_public, \
    is_ai_generated, created_utc, updated_utc";

const WORKOUT_COLUMNS: &str = "workout_id, user_id, template_id, name, workout_type, status, \
    scheduled_date, started_at, completed_at, \
    (EXTRACT(EPOCH FROM (completed_at - started_at)) / 60)::INT AS duration_minutes, \
    actual_duration, calories_burned, average_heart_rate, max_heart_rate, perceived_exertion, \
    user_rating, notes, ai_prompt_context, created_utc, updated_utc";

/// Raw completed-workout aggregates for one user.
#[derive(Debug, Clone, FromRow)]
pub struct WorkoutTotals {
    pub total_workouts: i64,
    pub workouts_this_week: i64,
    pub workouts_this_month: i64,
    pub total_calories_burned: i64,
    pub average_duration_minutes: f64,
    /// Every workout that left the `scheduled` state.
    pub attempted: i64,
}

impl Database {
    // =========================================================================
    // Exercise catalogue
    // =========================================================================

    #[instrument(skip(self, filter))]
    pub async fn list_exercises(
        &self,
        filter: &ListExercisesFilter,
    ) -> Result<Vec<Exercise>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_exercises"])
            .start_timer();

        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT exercise_id, name, description, instructions, muscle_groups, equipment, difficulty, calories_per_minute, created_utc
            FROM exercises
            WHERE ($1::text IS NULL OR $1 = ANY(muscle_groups))
              AND ($2::text IS NULL OR equipment = $2)
              AND ($3::text IS NULL OR difficulty = $3)
            ORDER BY name
            "#,
        )
        .bind(&filter.muscle_group)
        .bind(&filter.equipment)
        .bind(filter.difficulty.map(|d| d.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list exercises: {}", e)))?;

        timer.observe_duration();
        Ok(exercises)
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Templates that are public or owned by `user_id`.
    #[instrument(skip(self, filter))]
    pub async fn list_templates(
        &self,
        user_id: Uuid,
        filter: &ListTemplatesFilter,
    ) -> Result<Vec<WorkoutTemplate>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_templates"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM workout_templates
            WHERE (is_public = TRUE OR created_by = $1)
              AND ($2::text IS NULL OR workout_type = $2)
              AND ($3::text IS NULL OR difficulty = $3)
              AND ($4::int IS NULL OR estimated_duration <= $4)
            ORDER BY name
            "#
        );

        let templates = sqlx::query_as::<_, WorkoutTemplate>(&sql)
            .bind(user_id)
            .bind(filter.workout_type.map(|t| t.as_str()))
            .bind(filter.difficulty.map(|d| d.as_str()))
            .bind(filter.max_duration)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list templates: {}", e))
            })?;

        timer.observe_duration();
        Ok(templates)
    }

    /// Public templates only, used for suggestions.
    #[instrument(skip(self))]
    pub async fn list_public_templates(
        &self,
        workout_type: Option<&str>,
        difficulty: Option<Difficulty>,
        limit: i64,
    ) -> Result<Vec<WorkoutTemplate>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_public_templates"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM workout_templates
            WHERE is_public = TRUE
              AND ($1::text IS NULL OR workout_type = $1)
              AND ($2::text IS NULL OR difficulty = $2)
            ORDER BY created_utc, name
            LIMIT $3
            "#
        );

        let templates = sqlx::query_as::<_, WorkoutTemplate>(&sql)
            .bind(workout_type)
            .bind(difficulty.map(|d| d.as_str()))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list public templates: {}", e))
            })?;

        timer.observe_duration();
        Ok(templates)
    }

    #[instrument(skip(self))]
    pub async fn get_template(
        &self,
        template_id: Uuid,
    ) -> Result<Option<WorkoutTemplate>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_template"])
            .start_timer();

        let sql = format!("SELECT {TEMPLATE_COLUMNS} FROM workout_templates WHERE template_id = $1");
        let template = sqlx::query_as::<_, WorkoutTemplate>(&sql)
            .bind(template_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get template: {}", e)))?;

        timer.observe_duration();
        Ok(template)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_template(
        &self,
        user_id: Uuid,
        input: &CreateWorkoutTemplate,
    ) -> Result<WorkoutTemplate, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_template"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO workout_templates (template_id, name, description, workout_type, difficulty, estimated_duration,
                                           intensity_level, equipment_needed, space_required, created_by, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );

        let template = sqlx::query_as::<_, WorkoutTemplate>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.workout_type.as_str())
            .bind(input.difficulty.as_str())
            .bind(input.estimated_duration)
            .bind(input.intensity_level)
            .bind(&input.equipment_needed)
            .bind(&input.space_required)
            .bind(user_id)
            .bind(input.is_public)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create template: {}", e))
            })?;

        timer.observe_duration();
        info!(template_id = %template.template_id, "Template created");

        Ok(template)
    }

    /// Owner-only; returns `None` when the template is missing or not owned.
    #[instrument(skip(self, input))]
    pub async fn update_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        input: &UpdateWorkoutTemplate,
    ) -> Result<Option<WorkoutTemplate>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_template"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE workout_templates
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                workout_type = COALESCE($5, workout_type),
                difficulty = COALESCE($6, difficulty),
                estimated_duration = COALESCE($7, estimated_duration),
                intensity_level = COALESCE($8, intensity_level),
                equipment_needed = COALESCE($9, equipment_needed),
                space_required = COALESCE($10, space_required),
                is_public = COALESCE($11, is_public),
                updated_utc = NOW()
            WHERE template_id = $1 AND created_by = $2
            RETURNING {TEMPLATE_COLUMNS}
            "#
        );

        let template = sqlx::query_as::<_, WorkoutTemplate>(&sql)
            .bind(template_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.workout_type.map(|t| t.as_str()))
            .bind(input.difficulty.map(|d| d.as_str()))
            .bind(input.estimated_duration)
            .bind(input.intensity_level)
            .bind(&input.equipment_needed)
            .bind(&input.space_required)
            .bind(input.is_public)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update template: {}", e))
            })?;

        timer.observe_duration();
        Ok(template)
    }

    #[instrument(skip(self))]
    pub async fn delete_template(&self, user_id: Uuid, template_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_template"])
            .start_timer();

        let result = sqlx::query(
            "DELETE FROM workout_templates WHERE template_id = $1 AND created_by = $2",
        )
        .bind(template_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete template: {}", e)))?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    /// Template types the user completes most often, most frequent first.
    #[instrument(skip(self))]
    pub async fn top_completed_workout_types(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<String>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["top_completed_workout_types"])
            .start_timer();

        let types = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.workout_type
            FROM workouts w
            JOIN workout_templates t ON t.template_id = w.template_id
            WHERE w.user_id = $1 AND w.status = 'completed'
            GROUP BY t.workout_type
            ORDER BY COUNT(*) DESC, t.workout_type
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to rank workout types: {}", e))
        })?;

        timer.observe_duration();
        Ok(types)
    }

    // =========================================================================
    // Workouts
    // =========================================================================

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_workout(&self, user_id: Uuid, input: &NewWorkout) -> Result<Workout, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_workout"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO workouts (workout_id, user_id, template_id, name, workout_type, scheduled_date, notes, ai_prompt_context)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {WORKOUT_COLUMNS}
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(input.template_id)
            .bind(&input.name)
            .bind(&input.workout_type)
            .bind(input.scheduled_date)
            .bind(&input.notes)
            .bind(&input.ai_prompt_context)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create workout: {}", e)))?;

        timer.observe_duration();
        info!(workout_id = %workout.workout_id, "Workout scheduled");

        Ok(workout)
    }

    #[instrument(skip(self, filter))]
    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: &ListWorkoutsFilter,
    ) -> Result<Vec<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_workouts"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::date IS NULL OR scheduled_date >= $3)
              AND ($4::date IS NULL OR scheduled_date <= $4)
            ORDER BY scheduled_date DESC, created_utc DESC
            "#
        );

        let workouts = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list workouts: {}", e)))?;

        timer.observe_duration();
        Ok(workouts)
    }

    #[instrument(skip(self))]
    pub async fn get_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<Option<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_workout"])
            .start_timer();

        let sql = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 AND workout_id = $2");
        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(workout_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get workout: {}", e)))?;

        timer.observe_duration();
        Ok(workout)
    }

    #[instrument(skip(self, input))]
    pub async fn update_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        input: &UpdateWorkout,
    ) -> Result<Option<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_workout"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE workouts
            SET name = COALESCE($3, name),
                scheduled_date = COALESCE($4, scheduled_date),
                status = COALESCE($5, status),
                perceived_exertion = COALESCE($6, perceived_exertion),
                user_rating = COALESCE($7, user_rating),
                notes = COALESCE($8, notes),
                updated_utc = NOW()
            WHERE user_id = $1 AND workout_id = $2
            RETURNING {WORKOUT_COLUMNS}
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(workout_id)
            .bind(&input.name)
            .bind(input.scheduled_date)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.perceived_exertion)
            .bind(input.user_rating)
            .bind(&input.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update workout: {}", e)))?;

        timer.observe_duration();
        Ok(workout)
    }

    #[instrument(skip(self))]
    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_workout"])
            .start_timer();

        let result = sqlx::query("DELETE FROM workouts WHERE user_id = $1 AND workout_id = $2")
            .bind(user_id)
            .bind(workout_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete workout: {}", e)))?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    /// Move a workout to `in_progress`.
    ///
    /// Returns `None` when the row is missing or already in progress or completed.
    #[instrument(skip(self))]
    pub async fn start_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<Option<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["start_workout"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE workouts
            SET status = 'in_progress', started_at = NOW(), completed_at = NULL, updated_utc = NOW()
            WHERE user_id = $1 AND workout_id = $2 AND status NOT IN ('in_progress', 'completed')
            RETURNING {WORKOUT_COLUMNS}
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(workout_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to start workout: {}", e)))?;

        timer.observe_duration();
        if let Some(w) = &workout {
            info!(workout_id = %w.workout_id, "Workout started");
        }

        Ok(workout)
    }

    /// Finish an in-progress workout and advance the user's streak.
    ///
    /// The workout row and the user row are both locked for the duration of
    /// the transaction. `Ok(None)` means the workout does not exist.
    #[instrument(skip(self, input))]
    pub async fn complete_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        input: &CompleteWorkout,
        today: NaiveDate,
    ) -> Result<Option<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["complete_workout"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM workouts WHERE user_id = $1 AND workout_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(workout_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock workout: {}", e)))?;

        match status.as_deref() {
            None => {
                tx.rollback().await.ok();
                return Ok(None);
            }
            Some("in_progress") => {}
            Some(_) => {
                tx.rollback().await.ok();
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Workout is not in progress"
                )));
            }
        }

        let sql = format!(
            r#"
            UPDATE workouts
            SET status = 'completed',
                completed_at = NOW(),
                actual_duration = COALESCE($3, GREATEST(0, (EXTRACT(EPOCH FROM (NOW() - started_at)) / 60)::INT)),
                calories_burned = COALESCE($4, calories_burned),
                average_heart_rate = COALESCE($5, average_heart_rate),
                max_heart_rate = COALESCE($6, max_heart_rate),
                perceived_exertion = COALESCE($7, perceived_exertion),
                user_rating = COALESCE($8, user_rating),
                notes = COALESCE($9, notes),
                updated_utc = NOW()
            WHERE workout_id = $1 AND user_id = $2
            RETURNING {WORKOUT_COLUMNS}
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(workout_id)
            .bind(user_id)
            .bind(input.actual_duration)
            .bind(input.calories_burned)
            .bind(input.average_heart_rate)
            .bind(input.max_heart_rate)
            .bind(input.perceived_exertion)
            .bind(input.user_rating)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to complete workout: {}", e))
            })?;

        let yesterday = today - Duration::days(1);
        let completed_yesterday = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM workouts
                WHERE user_id = $1
                  AND status = 'completed'
                  AND workout_id <> $2
                  AND (completed_at AT TIME ZONE 'UTC')::date = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(workout_id)
        .bind(yesterday)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check previous workout: {}", e))
        })?;

        let (current, longest, last_workout_date) =
            sqlx::query_as::<_, (i32, i32, Option<NaiveDate>)>(
                "SELECT workout_streak, longest_streak, last_workout_date FROM users WHERE user_id = $1 FOR UPDATE",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock user: {}", e)))?;

        // A second completion on the same day leaves the streak alone
        let streak = if last_workout_date == Some(today) {
            current.max(1)
        } else {
            next_streak(current, completed_yesterday)
        };

        sqlx::query(
            r#"
            UPDATE users
            SET workout_streak = $2, longest_streak = $3, last_workout_date = $4, updated_utc = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(streak)
        .bind(longest.max(streak))
        .bind(today)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update streak: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        info!(workout_id = %workout_id, streak = streak, "Workout completed");

        Ok(Some(workout))
    }

    /// First non-cancelled workout scheduled on `date`.
    #[instrument(skip(self))]
    pub async fn workout_scheduled_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["workout_scheduled_on"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1 AND scheduled_date = $2 AND status <> 'cancelled'
            ORDER BY created_utc
            LIMIT 1
            "#
        );

        let workout = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get today's workout: {}", e))
            })?;

        timer.observe_duration();
        Ok(workout)
    }

    /// Completed workouts finished at or after `since`, newest first.
    #[instrument(skip(self))]
    pub async fn completed_workouts_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: Option<i64>,
    ) -> Result<Vec<Workout>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["completed_workouts_since"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1 AND status = 'completed' AND completed_at >= $2
            ORDER BY completed_at DESC
            LIMIT $3
            "#
        );

        let workouts = sqlx::query_as::<_, Workout>(&sql)
            .bind(user_id)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list completed workouts: {}", e))
            })?;

        timer.observe_duration();
        Ok(workouts)
    }

    #[instrument(skip(self))]
    pub async fn workout_totals(&self, user_id: Uuid) -> Result<WorkoutTotals, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["workout_totals"])
            .start_timer();

        let totals = sqlx::query_as::<_, WorkoutTotals>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'completed') AS total_workouts,
                COUNT(*) FILTER (WHERE status = 'completed' AND completed_at >= NOW() - INTERVAL '7 days') AS workouts_this_week,
                COUNT(*) FILTER (WHERE status = 'completed' AND completed_at >= NOW() - INTERVAL '30 days') AS workouts_this_month,
                COALESCE(SUM(calories_burned) FILTER (WHERE status = 'completed'), 0)::BIGINT AS total_calories_burned,
                COALESCE(AVG(actual_duration) FILTER (WHERE status = 'completed'), 0)::DOUBLE PRECISION AS average_duration_minutes,
                COUNT(*) FILTER (WHERE status <> 'scheduled') AS attempted
            FROM workouts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to compute workout totals: {}", e)))?;

        timer.observe_duration();
        Ok(totals)
    }
}

