use super::Database;
use crate::models::{
    ContentRequest, ContentStatus, CreateContentRequest, CreateHealthInsight, CreateNutritionPlan, HealthInsight,
    ListContentRequestsFilter, ListInsightsFilter, ListNutritionPlansFilter, NutritionPlan,
    UpdateHealthInsight, UpdateNutritionPlan,
};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

/// A rated content request and the rating it had before.
#[derive(Debug, Clone)]
pub struct RatedRequest {
    pub request: ContentRequest,
    pub previous_rating: Option<i32>,
}

const REQUEST_COLUMNS: &str = "request_id, user_id, content_type, status, user_context, \
    prompt_context, generated_content, tokens_used, generation_time_seconds, user_rating, \
    user_feedback, error_message, retry_count, created_utc, updated_utc, completed_at";

const PLAN_COLUMNS: &str = "plan_id, user_id, ai_request_id, name, description, content, \
    daily_calories, protein_grams, carbs_grams, fats_grams, meal_plan, shopping_list, \
    preparation_tips, duration_days, is_active, created_utc, updated_utc";

const INSIGHT_COLUMNS: &str = "insight_id, user_id, ai_request_id, insight_type, priority, title, \
    content, recommendations, data_sources, confidence_score, is_read, is_dismissed, user_rating, \
    created_utc, updated_utc";

impl Database {
    // =========================================================================
    // Content requests
    // =========================================================================

    #[instrument(skip(self, input), fields(user_id = %input.user_id, content_type = input.content_type.as_str()))]
    pub async fn create_content_request(
        &self,
        input: &CreateContentRequest,
    ) -> Result<ContentRequest, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_content_request"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO content_requests (request_id, user_id, content_type, status, user_context, prompt_context)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let request = sqlx::query_as::<_, ContentRequest>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.user_id)
            .bind(input.content_type.as_str())
            .bind(input.status.as_str())
            .bind(&input.user_context)
            .bind(&input.prompt_context)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create content request: {}", e))
            })?;

        timer.observe_duration();
        info!(request_id = %request.request_id, "Content request created");

        Ok(request)
    }

    #[instrument(skip(self, content))]
    pub async fn mark_request_completed(
        &self,
        request_id: Uuid,
        content: &str,
        tokens_used: i64,
        generation_time_seconds: f64,
        retry_count: i32,
    ) -> Result<ContentRequest, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_request_completed"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE content_requests
            SET status = 'completed',
                generated_content = $2,
                tokens_used = $3,
                generation_time_seconds = $4,
                retry_count = $5,
                completed_at = NOW(),
                updated_utc = NOW()
            WHERE request_id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let request = sqlx::query_as::<_, ContentRequest>(&sql)
            .bind(request_id)
            .bind(content)
            .bind(tokens_used)
            .bind(generation_time_seconds)
            .bind(retry_count)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to complete content request: {}", e))
            })?;

        timer.observe_duration();
        Ok(request)
    }

    /// Store the failure. `error_message` is kept verbatim.
    #[instrument(skip(self, error_message))]
    pub async fn mark_request_failed(
        &self,
        request_id: Uuid,
        error_message: &str,
        generation_time_seconds: f64,
        retry_count: i32,
    ) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_request_failed"])
            .start_timer();

        sqlx::query(
            r#"
            UPDATE content_requests
            SET status = 'failed',
                error_message = $2,
                generation_time_seconds = $3,
                retry_count = $4,
                updated_utc = NOW()
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .bind(error_message)
        .bind(generation_time_seconds)
        .bind(retry_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to mark content request failed: {}", e))
        })?;

        timer.observe_duration();
        Ok(())
    }

    /// Newest first.
    #[instrument(skip(self, filter))]
    pub async fn list_content_requests(
        &self,
        user_id: Uuid,
        filter: &ListContentRequestsFilter,
    ) -> Result<Vec<ContentRequest>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_content_requests"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {REQUEST_COLUMNS}
            FROM content_requests
            WHERE user_id = $1
              AND ($2::text IS NULL OR content_type = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_utc DESC
            "#
        );

        let requests = sqlx::query_as::<_, ContentRequest>(&sql)
            .bind(user_id)
            .bind(filter.content_type.map(|t| t.as_str()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list content requests: {}", e))
            })?;

        timer.observe_duration();
        Ok(requests)
    }

    #[instrument(skip(self))]
    pub async fn get_content_request(
        &self,
        user_id: Uuid,
        request_id: Uuid,
    ) -> Result<Option<ContentRequest>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_content_request"])
            .start_timer();

        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM content_requests WHERE user_id = $1 AND request_id = $2"
        );
        let request = sqlx::query_as::<_, ContentRequest>(&sql)
            .bind(user_id)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get content request: {}", e))
            })?;

        timer.observe_duration();
        Ok(request)
    }

    /// Store a rating on one of the user's completed requests.
    ///
    /// Returns the updated row and the rating it replaced. Requests that are
    /// not completed are rejected with 400.
    #[instrument(skip(self, feedback))]
    pub async fn submit_feedback(
        &self,
        user_id: Uuid,
        request_id: Uuid,
        rating: i32,
        feedback: Option<&str>,
    ) -> Result<Option<RatedRequest>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["submit_feedback"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let current: Option<(String, Option<i32>)> = sqlx::query_as(
            "SELECT status, user_rating FROM content_requests WHERE user_id = $1 AND request_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock content request: {}", e)))?;

        let Some((status, previous_rating)) = current else {
            tx.rollback().await.ok();
            timer.observe_duration();
            return Ok(None);
        };

        if ContentStatus::from_string(&status) != ContentStatus::Completed {
            tx.rollback().await.ok();
            timer.observe_duration();
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Feedback can only be given on completed requests"
            )));
        }

        let sql = format!(
            r#"
            UPDATE content_requests
            SET user_rating = $3,
                user_feedback = COALESCE($4, user_feedback),
                updated_utc = NOW()
            WHERE user_id = $1 AND request_id = $2
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let request = sqlx::query_as::<_, ContentRequest>(&sql)
            .bind(user_id)
            .bind(request_id)
            .bind(rating)
            .bind(feedback)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to submit feedback: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        Ok(Some(RatedRequest {
            request,
            previous_rating,
        }))
    }

    // =========================================================================
    // Nutrition plans
    // =========================================================================

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_nutrition_plan(
        &self,
        input: &CreateNutritionPlan,
    ) -> Result<NutritionPlan, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_nutrition_plan"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO nutrition_plans (plan_id, user_id, ai_request_id, name, description, content, duration_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PLAN_COLUMNS}
            "#
        );

        let plan = sqlx::query_as::<_, NutritionPlan>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.user_id)
            .bind(input.ai_request_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.content)
            .bind(input.duration_days)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create nutrition plan: {}", e))
            })?;

        timer.observe_duration();
        info!(plan_id = %plan.plan_id, "Nutrition plan created");

        Ok(plan)
    }

    #[instrument(skip(self, filter))]
    pub async fn list_nutrition_plans(
        &self,
        user_id: Uuid,
        filter: &ListNutritionPlansFilter,
    ) -> Result<Vec<NutritionPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_nutrition_plans"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM nutrition_plans
            WHERE user_id = $1
              AND ($2::bool IS NOT TRUE OR is_active = TRUE)
            ORDER BY created_utc DESC
            "#
        );

        let plans = sqlx::query_as::<_, NutritionPlan>(&sql)
            .bind(user_id)
            .bind(filter.active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list nutrition plans: {}", e))
            })?;

        timer.observe_duration();
        Ok(plans)
    }

    #[instrument(skip(self))]
    pub async fn get_nutrition_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Option<NutritionPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_nutrition_plan"])
            .start_timer();

        let sql = format!("SELECT {PLAN_COLUMNS} FROM nutrition_plans WHERE user_id = $1 AND plan_id = $2");
        let plan = sqlx::query_as::<_, NutritionPlan>(&sql)
            .bind(user_id)
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get nutrition plan: {}", e))
            })?;

        timer.observe_duration();
        Ok(plan)
    }

    #[instrument(skip(self, input))]
    pub async fn update_nutrition_plan(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        input: &UpdateNutritionPlan,
    ) -> Result<Option<NutritionPlan>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_nutrition_plan"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE nutrition_plans
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                daily_calories = COALESCE($5, daily_calories),
                protein_grams = COALESCE($6, protein_grams),
                carbs_grams = COALESCE($7, carbs_grams),
                fats_grams = COALESCE($8, fats_grams),
                meal_plan = COALESCE($9, meal_plan),
                shopping_list = COALESCE($10, shopping_list),
                preparation_tips = COALESCE($11, preparation_tips),
                duration_days = COALESCE($12, duration_days),
                is_active = COALESCE($13, is_active),
                updated_utc = NOW()
            WHERE user_id = $1 AND plan_id = $2
            RETURNING {PLAN_COLUMNS}
            "#
        );

        let plan = sqlx::query_as::<_, NutritionPlan>(&sql)
            .bind(user_id)
            .bind(plan_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.daily_calories)
            .bind(input.protein_grams)
            .bind(input.carbs_grams)
            .bind(input.fats_grams)
            .bind(&input.meal_plan)
            .bind(&input.shopping_list)
            .bind(&input.preparation_tips)
            .bind(input.duration_days)
            .bind(input.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update nutrition plan: {}", e))
            })?;

        timer.observe_duration();
        Ok(plan)
    }

    #[instrument(skip(self))]
    pub async fn delete_nutrition_plan(&self, user_id: Uuid, plan_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_nutrition_plan"])
            .start_timer();

        let result = sqlx::query("DELETE FROM nutrition_plans WHERE user_id = $1 AND plan_id = $2")
            .bind(user_id)
            .bind(plan_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete nutrition plan: {}", e))
            })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Health insights
    // =========================================================================

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create_health_insight(
        &self,
        input: &CreateHealthInsight,
    ) -> Result<HealthInsight, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_health_insight"])
            .start_timer();

        let sql = format!(
            r#"
            INSERT INTO health_insights (insight_id, user_id, ai_request_id, insight_type, priority, title, content,
                                         data_sources, confidence_score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {INSIGHT_COLUMNS}
            "#
        );

        let insight = sqlx::query_as::<_, HealthInsight>(&sql)
            .bind(Uuid::new_v4())
            .bind(input.user_id)
            .bind(input.ai_request_id)
            .bind(input.insight_type.as_str())
            .bind(input.priority.as_str())
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.data_sources)
            .bind(input.confidence_score)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create health insight: {}", e))
            })?;

        timer.observe_duration();
        info!(insight_id = %insight.insight_id, "Health insight created");

        Ok(insight)
    }

    /// Dismissed insights are never listed.
    #[instrument(skip(self, filter))]
    pub async fn list_health_insights(
        &self,
        user_id: Uuid,
        filter: &ListInsightsFilter,
    ) -> Result<Vec<HealthInsight>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_health_insights"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {INSIGHT_COLUMNS}
            FROM health_insights
            WHERE user_id = $1
              AND is_dismissed = FALSE
              AND ($2::text IS NULL OR insight_type = $2)
              AND ($3::text IS NULL OR priority = $3)
              AND ($4::bool IS NOT TRUE OR is_read = FALSE)
            ORDER BY created_utc DESC
            "#
        );

        let insights = sqlx::query_as::<_, HealthInsight>(&sql)
            .bind(user_id)
            .bind(filter.insight_type.map(|t| t.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.unread_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to list health insights: {}", e))
            })?;

        timer.observe_duration();
        Ok(insights)
    }

    #[instrument(skip(self))]
    pub async fn get_health_insight(
        &self,
        user_id: Uuid,
        insight_id: Uuid,
    ) -> Result<Option<HealthInsight>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_health_insight"])
            .start_timer();

        let sql = format!(
            "SELECT {INSIGHT_COLUMNS} FROM health_insights WHERE user_id = $1 AND insight_id = $2"
        );
        let insight = sqlx::query_as::<_, HealthInsight>(&sql)
            .bind(user_id)
            .bind(insight_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to get health insight: {}", e))
            })?;

        timer.observe_duration();
        Ok(insight)
    }

    #[instrument(skip(self, input))]
    pub async fn update_health_insight(
        &self,
        user_id: Uuid,
        insight_id: Uuid,
        input: &UpdateHealthInsight,
    ) -> Result<Option<HealthInsight>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_health_insight"])
            .start_timer();

        let sql = format!(
            r#"
            UPDATE health_insights
            SET is_read = COALESCE($3, is_read),
                is_dismissed = COALESCE($4, is_dismissed),
                user_rating = COALESCE($5, user_rating),
                updated_utc = NOW()
            WHERE user_id = $1 AND insight_id = $2
            RETURNING {INSIGHT_COLUMNS}
            "#
        );

        let insight = sqlx::query_as::<_, HealthInsight>(&sql)
            .bind(user_id)
            .bind(insight_id)
            .bind(input.is_read)
            .bind(input.is_dismissed)
            .bind(input.user_rating)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update health insight: {}", e))
            })?;

        timer.observe_duration();
        Ok(insight)
    }
}
