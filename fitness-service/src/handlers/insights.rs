use axum::{
    extract::{Path, State},
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::not_found;
use crate::middleware::AuthUser;
use crate::models::{HealthInsight, ListInsightsFilter, UpdateHealthInsight};
use crate::utils::{ValidatedJson, ValidatedQuery};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/ai/insights",
    params(
        ("insight_type" = Option<String>, Query, description = "Insight type"),
        ("priority" = Option<String>, Query, description = "low, medium, high or urgent"),
        ("unread_only" = Option<bool>, Query, description = "Only unread insights")
    ),
    responses((status = 200, description = "Own insights, dismissed ones hidden", body = [HealthInsight])),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn list_insights(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListInsightsFilter>,
) -> Result<Json<Vec<HealthInsight>>, AppError> {
    Ok(Json(
        state.db.list_health_insights(auth.user_id, &filter).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/ai/insights/{id}",
    params(("id" = Uuid, Path, description = "Insight id")),
    responses(
        (status = 200, description = "Health insight", body = HealthInsight),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn get_insight(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(insight_id): Path<Uuid>,
) -> Result<Json<HealthInsight>, AppError> {
    state
        .db
        .get_health_insight(auth.user_id, insight_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Insight not found"))
}

#[utoipa::path(
    patch,
    path = "/api/ai/insights/{id}",
    params(("id" = Uuid, Path, description = "Insight id")),
    request_body = UpdateHealthInsight,
    responses(
        (status = 200, description = "Updated insight", body = HealthInsight),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn update_insight(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(insight_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateHealthInsight>,
) -> Result<Json<HealthInsight>, AppError> {
    state
        .db
        .update_health_insight(auth.user_id, insight_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Insight not found"))
}
