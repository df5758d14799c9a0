use super::Database;
use crate::models::{CreateWorkoutGoal, ListGoalsFilter, UpdateWorkoutGoal, WorkoutGoal};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

impl Database {
    #[instrument(skip(self, input), fields(goal_type = input.goal_type.as_str()))]
    pub async fn create_goal(
        &self,
        user_id: Uuid,
        input: &CreateWorkoutGoal,
    ) -> Result<WorkoutGoal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_goal"])
            .start_timer();

        let goal = sqlx::query_as::<_, WorkoutGoal>(
            r#"
            INSERT INTO workout_goals (goal_id, user_id, goal_type, description, target_value, unit, target_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING goal_id, user_id, goal_type, description, target_value, unit, target_date, is_active, achieved_utc, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(input.goal_type.as_str())
        .bind(&input.description)
        .bind(input.target_value)
        .bind(&input.unit)
        .bind(input.target_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create goal: {}", e)))?;

        timer.observe_duration();
        info!(goal_id = %goal.goal_id, "Goal created");

        Ok(goal)
    }

    #[instrument(skip(self, filter))]
    pub async fn list_goals(
        &self,
        user_id: Uuid,
        filter: &ListGoalsFilter,
    ) -> Result<Vec<WorkoutGoal>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_goals"])
            .start_timer();

        let goals = sqlx::query_as::<_, WorkoutGoal>(
            r#"
            SELECT goal_id, user_id, goal_type, description, target_value, unit, target_date, is_active, achieved_utc, created_utc, updated_utc
            FROM workout_goals
            WHERE user_id = $1
              AND ($2::bool IS NOT TRUE OR is_active = TRUE)
            ORDER BY created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list goals: {}", e)))?;

        timer.observe_duration();
        Ok(goals)
    }

    #[instrument(skip(self))]
    pub async fn get_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
    ) -> Result<Option<WorkoutGoal>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_goal"])
            .start_timer();

        let goal = sqlx::query_as::<_, WorkoutGoal>(
            r#"
            SELECT goal_id, user_id, goal_type, description, target_value, unit, target_date, is_active, achieved_utc, created_utc, updated_utc
            FROM workout_goals
            WHERE user_id = $1 AND goal_id = $2
            "#,
        )
        .bind(user_id)
        .bind(goal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get goal: {}", e)))?;

        timer.observe_duration();
        Ok(goal)
    }

    /// `achieved = true` stamps `achieved_utc` and deactivates the goal;
    /// `achieved = false` clears the stamp.
    #[instrument(skip(self, input))]
    pub async fn update_goal(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        input: &UpdateWorkoutGoal,
    ) -> Result<Option<WorkoutGoal>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_goal"])
            .start_timer();

        let goal = sqlx::query_as::<_, WorkoutGoal>(
            r#"
            UPDATE workout_goals
            SET goal_type = COALESCE($3, goal_type),
                description = COALESCE($4, description),
                target_value = COALESCE($5, target_value),
                unit = COALESCE($6, unit),
                target_date = COALESCE($7, target_date),
                is_active = CASE WHEN $9::bool IS TRUE THEN FALSE ELSE COALESCE($8, is_active) END,
                achieved_utc = CASE
                    WHEN $9::bool IS TRUE THEN COALESCE(achieved_utc, NOW())
                    WHEN $9::bool IS FALSE THEN NULL
                    ELSE achieved_utc
                END,
                updated_utc = NOW()
            WHERE user_id = $1 AND goal_id = $2
            RETURNING goal_id, user_id, goal_type, description, target_value, unit, target_date, is_active, achieved_utc, created_utc, updated_utc
            "#,
        )
        .bind(user_id)
        .bind(goal_id)
        .bind(input.goal_type.map(|t| t.as_str()))
        .bind(&input.description)
        .bind(input.target_value)
        .bind(&input.unit)
        .bind(input.target_date)
        .bind(input.is_active)
        .bind(input.achieved)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update goal: {}", e)))?;

        timer.observe_duration();
        Ok(goal)
    }

    #[instrument(skip(self))]
    pub async fn delete_goal(&self, user_id: Uuid, goal_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_goal"])
            .start_timer();

        let result = sqlx::query("DELETE FROM workout_goals WHERE user_id = $1 AND goal_id = $2")
            .bind(user_id)
            .bind(goal_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete goal: {}", e)))?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn count_active_goals(&self, user_id: Uuid) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_active_goals"])
            .start_timer();

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_goals WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count goals: {}", e)))?;

        timer.observe_duration();
        Ok(count)
    }
}
