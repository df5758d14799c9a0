use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use service_core::error::AppError;
use tracing::info;
use uuid::Uuid;

use super::{load_user, not_found};
use crate::dtos::ai::{
    AnalyzeHealthRequest, FeedbackRequest, FeedbackResponse, GenerateNutritionRequest,
    GenerateWorkoutRequest, GenerationResponse,
};
use crate::middleware::AuthUser;
use crate::models::{ContentRequest, ContentType, ListContentRequestsFilter};
use crate::services::generation::prompts::{
    health_analysis_prompt, nutrition_prompt, workout_prompt, ProfileContext,
};
use crate::services::{DerivedEntity, GenerationJob};
use crate::utils::{ValidatedJson, ValidatedQuery};
use crate::AppState;

const RECENT_WORKOUT_DAYS: i64 = 30;
const RECENT_WORKOUT_LIMIT: i64 = 5;

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to serialize context: {}", e)))
}

#[utoipa::path(
    get,
    path = "/api/ai/requests",
    params(
        ("content_type" = Option<String>, Query, description = "workout, nutrition or health_analysis"),
        ("status" = Option<String>, Query, description = "pending, processing, completed or failed")
    ),
    responses((status = 200, description = "Own content requests, newest first", body = [ContentRequest])),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListContentRequestsFilter>,
) -> Result<Json<Vec<ContentRequest>>, AppError> {
    Ok(Json(
        state.db.list_content_requests(auth.user_id, &filter).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/ai/requests/{id}",
    params(("id" = Uuid, Path, description = "Request id")),
    responses(
        (status = 200, description = "Content request", body = ContentRequest),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn get_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<ContentRequest>, AppError> {
    state
        .db
        .get_content_request(auth.user_id, request_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Request not found"))
}

/// Rate a generated response and fold the rating into that day's usage row.
#[utoipa::path(
    post,
    path = "/api/ai/requests/{id}/feedback",
    params(("id" = Uuid, Path, description = "Request id")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored", body = FeedbackResponse),
        (status = 400, description = "Request is not completed", body = ErrorResponse),
        (status = 404, description = "Request not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let rated = state
        .db
        .submit_feedback(
            auth.user_id,
            request_id,
            body.rating,
            body.feedback.as_deref(),
        )
        .await?
        .ok_or_else(|| not_found("Request not found"))?;

    // Re-ratings replace the stored rating but are not folded into the daily average again.
    if rated.previous_rating.is_none() {
        state
            .usage
            .record_rating(
                auth.user_id,
                rated.request.created_utc.date_naive(),
                body.rating,
            )
            .await?;
    }

    info!(request_id = %request_id, rating = body.rating, "Feedback submitted");
    Ok(Json(FeedbackResponse {
        message: "Feedback submitted successfully".to_string(),
        rating: body.rating,
    }))
}

#[utoipa::path(
    post,
    path = "/api/ai/generate/workout",
    request_body = GenerateWorkoutRequest,
    responses(
        (status = 200, description = "Generation outcome; `success` is false when the model call failed", body = GenerationResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn generate_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<GenerateWorkoutRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let profile = ProfileContext::from_user(&user);
    let parameters = to_json(&body)?;

    let job = GenerationJob {
        user_id: auth.user_id,
        category: ContentType::Workout,
        user_context: to_json(&profile)?,
        prompt_context: parameters.clone(),
        prompt: workout_prompt(&profile, &body),
        derived: DerivedEntity::Workout {
            workout_type: body.workout_type,
            parameters,
        },
    };

    Ok(Json(state.content.generate(job).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/ai/generate/nutrition",
    request_body = GenerateNutritionRequest,
    responses(
        (status = 200, description = "Generation outcome; `success` is false when the model call failed", body = GenerationResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn generate_nutrition(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<GenerateNutritionRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let profile = ProfileContext::from_user(&user);

    let job = GenerationJob {
        user_id: auth.user_id,
        category: ContentType::Nutrition,
        user_context: to_json(&profile)?,
        prompt_context: to_json(&body)?,
        prompt: nutrition_prompt(&profile, &body),
        derived: DerivedEntity::NutritionPlan {
            duration_days: body.plan_duration_days,
        },
    };

    Ok(Json(state.content.generate(job).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/ai/analyze/health",
    request_body = AnalyzeHealthRequest,
    responses(
        (status = 200, description = "Generation outcome; `success` is false when the model call failed", body = GenerationResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn analyze_health(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<AnalyzeHealthRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let profile = ProfileContext::from_user(&user);

    let vitals = if body.include_medical_data {
        state.db.latest_medical_record(auth.user_id).await?
    } else {
        None
    };
    let recent_workouts = if body.include_workout_data {
        state
            .db
            .completed_workouts_since(
                auth.user_id,
                Utc::now() - Duration::days(RECENT_WORKOUT_DAYS),
                Some(RECENT_WORKOUT_LIMIT),
            )
            .await?
    } else {
        Vec::new()
    };

    let medical_data = vitals
        .as_ref()
        .map(|record| record.vitals())
        .unwrap_or_else(|| json!({}));

    let job = GenerationJob {
        user_id: auth.user_id,
        category: ContentType::HealthAnalysis,
        user_context: json!({ "medical_data": medical_data }),
        prompt_context: to_json(&body)?,
        prompt: health_analysis_prompt(&profile, vitals.as_ref(), &recent_workouts, &body),
        derived: DerivedEntity::HealthInsight {
            data_sources: medical_data,
        },
    };

    Ok(Json(state.content.generate(job).await?.into()))
}
