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
use crate::models::{
    CreateWorkoutTemplate, ListTemplatesFilter, UpdateWorkoutTemplate, WorkoutTemplate,
};
use crate::utils::{ValidatedJson, ValidatedQuery};
use crate::AppState;

/// Load a template the caller may modify: 404 when invisible, 403 when not theirs.
async fn owned_template(
    state: &AppState,
    user_id: Uuid,
    template_id: Uuid,
) -> Result<WorkoutTemplate, AppError> {
    let template = state
        .db
        .get_template(template_id)
        .await?
        .filter(|t| t.is_visible_to(user_id))
        .ok_or_else(|| not_found("Template not found"))?;

    if !template.is_owned_by(user_id) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "You can only modify templates you created"
        )));
    }
    Ok(template)
}

#[utoipa::path(
    get,
    path = "/api/workouts/templates",
    params(
        ("workout_type" = Option<String>, Query, description = "Filter by workout type"),
        ("difficulty" = Option<String>, Query, description = "Filter by difficulty"),
        ("max_duration" = Option<i32>, Query, description = "Maximum estimated duration in minutes")
    ),
    responses((status = 200, description = "Public templates and own templates", body = [WorkoutTemplate])),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListTemplatesFilter>,
) -> Result<Json<Vec<WorkoutTemplate>>, AppError> {
    Ok(Json(state.db.list_templates(auth.user_id, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/workouts/templates",
    request_body = CreateWorkoutTemplate,
    responses(
        (status = 201, description = "Template created", body = WorkoutTemplate),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateWorkoutTemplate>,
) -> Result<impl IntoResponse, AppError> {
    let template = state.db.create_template(auth.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

#[utoipa::path(
    get,
    path = "/api/workouts/templates/{id}",
    params(("id" = Uuid, Path, description = "Template id")),
    responses(
        (status = 200, description = "Template", body = WorkoutTemplate),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
) -> Result<Json<WorkoutTemplate>, AppError> {
    state
        .db
        .get_template(template_id)
        .await?
        .filter(|t| t.is_visible_to(auth.user_id))
        .map(Json)
        .ok_or_else(|| not_found("Template not found"))
}

#[utoipa::path(
    patch,
    path = "/api/workouts/templates/{id}",
    params(("id" = Uuid, Path, description = "Template id")),
    request_body = UpdateWorkoutTemplate,
    responses(
        (status = 200, description = "Updated template", body = WorkoutTemplate),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateWorkoutTemplate>,
) -> Result<Json<WorkoutTemplate>, AppError> {
    owned_template(&state, auth.user_id, template_id).await?;
    state
        .db
        .update_template(auth.user_id, template_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Template not found"))
}

#[utoipa::path(
    delete,
    path = "/api/workouts/templates/{id}",
    params(("id" = Uuid, Path, description = "Template id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn delete_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(template_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_template(&state, auth.user_id, template_id).await?;
    if state.db.delete_template(auth.user_id, template_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Template not found"))
    }
}
