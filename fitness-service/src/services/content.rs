//! Generation flow: request row, model call, derived record, usage accounting.

use crate::dtos::ai::GenerationResponse;
use crate::models::{
    ContentRequest, ContentStatus, ContentType, CreateContentRequest, CreateHealthInsight,
    CreateNutritionPlan, InsightPriority, InsightType, NewWorkout, WorkoutType,
};
use crate::services::database::Database;
use crate::services::generation::{ContentGenerator, Generation};
use crate::services::metrics;
use crate::services::usage::UsageAggregator;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use service_core::error::AppError;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub const GENERATION_FAILED_MESSAGE: &str = "Content generation failed. Please try again.";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "AI service temporarily unavailable";

/// Record created from successfully generated text.
#[derive(Debug, Clone)]
pub enum DerivedEntity {
    Workout {
        workout_type: WorkoutType,
        parameters: Value,
    },
    NutritionPlan {
        duration_days: i32,
    },
    HealthInsight {
        data_sources: Value,
    },
}

/// Everything needed for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub user_id: Uuid,
    pub category: ContentType,
    pub user_context: Value,
    pub prompt_context: Value,
    pub prompt: String,
    pub derived: DerivedEntity,
}

#[derive(Debug)]
pub enum GenerationReport {
    Completed {
        request: ContentRequest,
        structured_data: Value,
    },
    /// The model call failed; the row holds the provider error.
    Failed { request_id: Uuid },
    /// Something other than the model call failed after the row was created.
    Unavailable { request_id: Uuid },
}

impl From<GenerationReport> for GenerationResponse {
    fn from(report: GenerationReport) -> Self {
        match report {
            GenerationReport::Completed {
                request,
                structured_data,
            } => GenerationResponse {
                success: true,
                request_id: request.request_id,
                content: request.generated_content,
                structured_data: Some(structured_data),
                tokens_used: Some(request.tokens_used),
                generation_time: request.generation_time_seconds,
                error_message: None,
            },
            GenerationReport::Failed { request_id } => failure(request_id, GENERATION_FAILED_MESSAGE),
            GenerationReport::Unavailable { request_id } => {
                failure(request_id, SERVICE_UNAVAILABLE_MESSAGE)
            }
        }
    }
}

fn failure(request_id: Uuid, message: &str) -> GenerationResponse {
    GenerationResponse {
        success: false,
        request_id,
        content: None,
        structured_data: None,
        tokens_used: None,
        generation_time: None,
        error_message: Some(message.to_string()),
    }
}

#[derive(Clone)]
pub struct ContentService {
    db: Database,
    generator: ContentGenerator,
    usage: UsageAggregator,
}

impl ContentService {
    pub fn new(db: Database, generator: ContentGenerator, usage: UsageAggregator) -> Self {
        Self {
            db,
            generator,
            usage,
        }
    }

    /// Run one generation. Only a failure to create the request row is returned as `Err`.
    #[instrument(skip(self, job), fields(user_id = %job.user_id, category = job.category.as_str()))]
    pub async fn generate(&self, job: GenerationJob) -> Result<GenerationReport, AppError> {
        let request = self
            .db
            .create_content_request(&CreateContentRequest {
                user_id: job.user_id,
                content_type: job.category,
                status: ContentStatus::Processing,
                user_context: job.user_context.clone(),
                prompt_context: job.prompt_context.clone(),
            })
            .await?;
        let request_id = request.request_id;

        let outcome = self.generator.generate(job.category, &job.prompt).await;
        let elapsed = outcome.elapsed_seconds();
        let retries = outcome.retries as i32;

        match outcome.result {
            Ok(generation) => {
                match self
                    .complete(&job, request_id, &generation, elapsed, retries)
                    .await
                {
                    Ok((request, structured_data)) => {
                        metrics::record_generation(
                            job.category.as_str(),
                            "completed",
                            elapsed,
                            generation.tokens_used(),
                        );
                        info!(
                            request_id = %request_id,
                            tokens = generation.tokens_used(),
                            retries,
                            "Content generated"
                        );
                        Ok(GenerationReport::Completed {
                            request,
                            structured_data,
                        })
                    }
                    Err(e) => {
                        error!(request_id = %request_id, error = %e, "Failed to store generated content");
                        self.fail_best_effort(&job, request_id, &e.to_string(), elapsed, retries)
                            .await;
                        metrics::record_generation(job.category.as_str(), "unavailable", elapsed, 0);
                        Ok(GenerationReport::Unavailable { request_id })
                    }
                }
            }
            Err(err) => {
                warn!(request_id = %request_id, error = %err, retries, "Content generation failed");
                metrics::record_generation(job.category.as_str(), "failed", elapsed, 0);

                let marked = self
                    .db
                    .mark_request_failed(request_id, &err.to_string(), elapsed, retries)
                    .await;
                if let Err(e) = &marked {
                    error!(request_id = %request_id, error = %e, "Failed to mark request failed");
                }

                let recorded = self
                    .usage
                    .record(job.user_id, job.category, false, 0, elapsed)
                    .await;
                if let Err(e) = &recorded {
                    error!(request_id = %request_id, error = %e, "Failed to record usage failure");
                }

                if marked.is_ok() && recorded.is_ok() {
                    Ok(GenerationReport::Failed { request_id })
                } else {
                    metrics::record_error("database", "record_generation_failure");
                    Ok(GenerationReport::Unavailable { request_id })
                }
            }
        }
    }

    async fn complete(
        &self,
        job: &GenerationJob,
        request_id: Uuid,
        generation: &Generation,
        elapsed: f64,
        retries: i32,
    ) -> Result<(ContentRequest, Value), AppError> {
        let request = self
            .db
            .mark_request_completed(
                request_id,
                &generation.text,
                generation.tokens_used(),
                elapsed,
                retries,
            )
            .await?;

        let structured_data = self
            .create_derived(job, request_id, &generation.text)
            .await?;

        self.usage
            .record(job.user_id, job.category, true, generation.tokens_used(), elapsed)
            .await?;

        Ok((request, structured_data))
    }

    async fn create_derived(
        &self,
        job: &GenerationJob,
        request_id: Uuid,
        text: &str,
    ) -> Result<Value, AppError> {
        let today = Utc::now().date_naive();

        match &job.derived {
            DerivedEntity::Workout {
                workout_type,
                parameters,
            } => {
                let workout = self
                    .db
                    .create_workout(
                        job.user_id,
                        &NewWorkout {
                            template_id: None,
                            name: generated_workout_name(*workout_type, today),
                            workout_type: Some(workout_type.as_str().to_string()),
                            scheduled_date: today,
                            notes: text.to_string(),
                            ai_prompt_context: Some(parameters.clone()),
                        },
                    )
                    .await?;
                Ok(json!({ "workout_id": workout.workout_id }))
            }
            DerivedEntity::NutritionPlan { duration_days } => {
                let plan = self
                    .db
                    .create_nutrition_plan(&CreateNutritionPlan {
                        user_id: job.user_id,
                        ai_request_id: Some(request_id),
                        name: format!("AI Nutrition Plan - {}", today),
                        description: "Personalized nutrition plan generated by AI".to_string(),
                        content: text.to_string(),
                        duration_days: *duration_days,
                    })
                    .await?;
                Ok(json!({ "nutrition_plan_id": plan.plan_id }))
            }
            DerivedEntity::HealthInsight { data_sources } => {
                let insight = self
                    .db
                    .create_health_insight(&CreateHealthInsight {
                        user_id: job.user_id,
                        ai_request_id: Some(request_id),
                        insight_type: InsightType::General,
                        priority: InsightPriority::Medium,
                        title: format!("Health Analysis - {}", today),
                        content: text.to_string(),
                        data_sources: data_sources.clone(),
                        confidence_score: 0.85,
                    })
                    .await?;
                Ok(json!({ "insight_id": insight.insight_id }))
            }
        }
    }

    async fn fail_best_effort(
        &self,
        job: &GenerationJob,
        request_id: Uuid,
        message: &str,
        elapsed: f64,
        retries: i32,
    ) {
        if let Err(e) = self
            .db
            .mark_request_failed(request_id, message, elapsed, retries)
            .await
        {
            error!(request_id = %request_id, error = %e, "Failed to mark request failed");
        }
        if let Err(e) = self
            .usage
            .record(job.user_id, job.category, false, 0, elapsed)
            .await
        {
            error!(request_id = %request_id, error = %e, "Failed to record usage failure");
        }
        metrics::record_error("database", "store_generated_content");
    }
}

pub fn generated_workout_name(workout_type: WorkoutType, date: NaiveDate) -> String {
    format!("AI {} Workout - {}", workout_type.display_name(), date)
}
