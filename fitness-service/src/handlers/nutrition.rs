use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::not_found;
use crate::middleware::AuthUser;
use crate::models::{ListNutritionPlansFilter, NutritionPlan, UpdateNutritionPlan};
use crate::utils::{ValidatedJson, ValidatedQuery};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/ai/nutrition",
    params(("active_only" = Option<bool>, Query, description = "Only active plans")),
    responses((status = 200, description = "Own nutrition plans", body = [NutritionPlan])),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListNutritionPlansFilter>,
) -> Result<Json<Vec<NutritionPlan>>, AppError> {
    Ok(Json(
        state.db.list_nutrition_plans(auth.user_id, &filter).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/ai/nutrition/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Nutrition plan", body = NutritionPlan),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<NutritionPlan>, AppError> {
    state
        .db
        .get_nutrition_plan(auth.user_id, plan_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Nutrition plan not found"))
}

#[utoipa::path(
    patch,
    path = "/api/ai/nutrition/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    request_body = UpdateNutritionPlan,
    responses(
        (status = 200, description = "Updated plan", body = NutritionPlan),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn update_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateNutritionPlan>,
) -> Result<Json<NutritionPlan>, AppError> {
    state
        .db
        .update_nutrition_plan(auth.user_id, plan_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Nutrition plan not found"))
}

#[utoipa::path(
    delete,
    path = "/api/ai/nutrition/{id}",
    params(("id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_nutrition_plan(auth.user_id, plan_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Nutrition plan not found"))
    }
}
