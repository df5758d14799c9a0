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
use crate::models::{CreateMedicalRecord, MedicalRecord, UpdateMedicalRecord};
use crate::utils::ValidatedJson;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/users/medical",
    responses((status = 200, description = "Own vitals records, newest first", body = [MedicalRecord])),
    tag = "Medical",
    security(("bearer_auth" = []))
)]
pub async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<MedicalRecord>>, AppError> {
    Ok(Json(state.db.list_medical_records(auth.user_id, None).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/medical",
    request_body = CreateMedicalRecord,
    responses(
        (status = 201, description = "Record created", body = MedicalRecord),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Medical",
    security(("bearer_auth" = []))
)]
pub async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateMedicalRecord>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.db.create_medical_record(auth.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/users/medical/{id}",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record", body = MedicalRecord),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Medical",
    security(("bearer_auth" = []))
)]
pub async fn get_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
) -> Result<Json<MedicalRecord>, AppError> {
    state
        .db
        .get_medical_record(auth.user_id, record_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Medical record not found"))
}

#[utoipa::path(
    patch,
    path = "/api/users/medical/{id}",
    params(("id" = Uuid, Path, description = "Record id")),
    request_body = CreateMedicalRecord,
    responses(
        (status = 200, description = "Updated record", body = MedicalRecord),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Medical",
    security(("bearer_auth" = []))
)]
pub async fn update_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateMedicalRecord>,
) -> Result<Json<MedicalRecord>, AppError> {
    state
        .db
        .update_medical_record(auth.user_id, record_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Medical record not found"))
}

#[utoipa::path(
    delete,
    path = "/api/users/medical/{id}",
    params(("id" = Uuid, Path, description = "Record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Medical",
    security(("bearer_auth" = []))
)]
pub async fn delete_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_medical_record(auth.user_id, record_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Medical record not found"))
    }
}
