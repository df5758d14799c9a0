use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use super::not_found;
use crate::middleware::AuthUser;
use crate::models::{CreateWorkoutGoal, ListGoalsFilter, UpdateWorkoutGoal, WorkoutGoal};
use crate::utils::{ValidatedJson, ValidatedQuery};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/users/goals",
    params(("active_only" = Option<bool>, Query, description = "Only active goals")),
    responses((status = 200, description = "Own goals, newest first", body = [WorkoutGoal])),
    tag = "Goals",
    security(("bearer_auth" = []))
)]
pub async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListGoalsFilter>,
) -> Result<Json<Vec<WorkoutGoal>>, AppError> {
    Ok(Json(state.db.list_goals(auth.user_id, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/goals",
    request_body = CreateWorkoutGoal,
    responses(
        (status = 201, description = "Goal created", body = WorkoutGoal),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Goals",
    security(("bearer_auth" = []))
)]
pub async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateWorkoutGoal>,
) -> Result<impl IntoResponse, AppError> {
    let goal = state.db.create_goal(auth.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

#[utoipa::path(
    get,
    path = "/api/users/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    responses(
        (status = 200, description = "Goal", body = WorkoutGoal),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Goals",
    security(("bearer_auth" = []))
)]
pub async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<WorkoutGoal>, AppError> {
    state
        .db
        .get_goal(auth.user_id, goal_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Goal not found"))
}

#[utoipa::path(
    patch,
    path = "/api/users/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    request_body = UpdateWorkoutGoal,
    responses(
        (status = 200, description = "Updated goal", body = WorkoutGoal),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Goals",
    security(("bearer_auth" = []))
)]
pub async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateWorkoutGoal>,
) -> Result<Json<WorkoutGoal>, AppError> {
    state
        .db
        .update_goal(auth.user_id, goal_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Goal not found"))
}

#[utoipa::path(
    delete,
    path = "/api/users/goals/{id}",
    params(("id" = Uuid, Path, description = "Goal id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Goals",
    security(("bearer_auth" = []))
)]
pub async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_goal(auth.user_id, goal_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Goal not found"))
    }
}
