use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use service_core::error::AppError;
use uuid::Uuid;

use super::{load_user, not_found};
use crate::dtos::workouts::{HistoryResponse, HistorySummary, TodayResponse};
use crate::dtos::DaysQuery;
use crate::middleware::AuthUser;
use crate::models::{
    completion_rate, default_workout_name, CompleteWorkout, CreateWorkout, Difficulty, Exercise,
    ListExercisesFilter, ListWorkoutsFilter, NewWorkout, UpdateWorkout, Workout, WorkoutStats,
    WorkoutStatus, WorkoutTemplate,
};
use crate::utils::{OptionalValidatedJson, ValidatedJson, ValidatedQuery};
use crate::AppState;

const SUGGESTED_TYPES: i64 = 3;
const SUGGESTIONS_PER_TYPE: i64 = 2;
const MAX_SUGGESTIONS: usize = 5;

#[utoipa::path(
    get,
    path = "/api/workouts/exercises",
    params(
        ("muscle_group" = Option<String>, Query, description = "Muscle group the exercise targets"),
        ("equipment" = Option<String>, Query, description = "Required equipment"),
        ("difficulty" = Option<String>, Query, description = "beginner, intermediate or advanced")
    ),
    responses((status = 200, description = "Exercise catalogue", body = [Exercise])),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn list_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListExercisesFilter>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    Ok(Json(state.db.list_exercises(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/workouts",
    params(
        ("status" = Option<String>, Query, description = "Workout status"),
        ("from" = Option<String>, Query, description = "Earliest scheduled date (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Latest scheduled date (YYYY-MM-DD)")
    ),
    responses((status = 200, description = "Own workouts", body = [Workout])),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(filter): ValidatedQuery<ListWorkoutsFilter>,
) -> Result<Json<Vec<Workout>>, AppError> {
    Ok(Json(state.db.list_workouts(auth.user_id, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/workouts",
    request_body = CreateWorkout,
    responses(
        (status = 201, description = "Workout scheduled", body = Workout),
        (status = 404, description = "Template not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn create_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateWorkout>,
) -> Result<impl IntoResponse, AppError> {
    let template = match body.template_id {
        Some(template_id) => Some(
            state
                .db
                .get_template(template_id)
                .await?
                .filter(|t| t.is_visible_to(auth.user_id))
                .ok_or_else(|| not_found("Template not found"))?,
        ),
        None => None,
    };

    let name = match (&body.name, &template) {
        (Some(name), _) => name.clone(),
        (None, Some(t)) => t.name.clone(),
        (None, None) => default_workout_name(body.workout_type, body.scheduled_date),
    };
    let workout_type = body
        .workout_type
        .map(|t| t.as_str().to_string())
        .or_else(|| template.as_ref().map(|t| t.workout_type.clone()));

    let workout = state
        .db
        .create_workout(
            auth.user_id,
            &NewWorkout {
                template_id: body.template_id,
                name,
                workout_type,
                scheduled_date: body.scheduled_date,
                notes: body.notes,
                ai_prompt_context: None,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

#[utoipa::path(
    get,
    path = "/api/workouts/{id}",
    params(("id" = Uuid, Path, description = "Workout id")),
    responses(
        (status = 200, description = "Workout", body = Workout),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Workout>, AppError> {
    state
        .db
        .get_workout(auth.user_id, workout_id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Workout not found"))
}

#[utoipa::path(
    patch,
    path = "/api/workouts/{id}",
    params(("id" = Uuid, Path, description = "Workout id")),
    request_body = UpdateWorkout,
    responses(
        (status = 200, description = "Updated workout", body = Workout),
        (status = 400, description = "Status must change through start/complete", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn update_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateWorkout>,
) -> Result<Json<Workout>, AppError> {
    if matches!(
        body.status,
        Some(WorkoutStatus::InProgress | WorkoutStatus::Completed)
    ) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Use the start and complete endpoints to change this status"
        )));
    }

    state
        .db
        .update_workout(auth.user_id, workout_id, &body)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Workout not found"))
}

#[utoipa::path(
    delete,
    path = "/api/workouts/{id}",
    params(("id" = Uuid, Path, description = "Workout id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.db.delete_workout(auth.user_id, workout_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Workout not found"))
    }
}

#[utoipa::path(
    post,
    path = "/api/workouts/{id}/start",
    params(("id" = Uuid, Path, description = "Workout id")),
    responses(
        (status = 200, description = "Workout started", body = Workout),
        (status = 400, description = "Already in progress or completed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn start_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Workout>, AppError> {
    if let Some(workout) = state.db.start_workout(auth.user_id, workout_id).await? {
        return Ok(Json(workout));
    }

    let existing = state
        .db
        .get_workout(auth.user_id, workout_id)
        .await?
        .ok_or_else(|| not_found("Workout not found"))?;

    let message = match existing.status() {
        WorkoutStatus::Completed => "Workout already completed",
        _ => "Workout already in progress",
    };
    Err(AppError::BadRequest(anyhow::anyhow!(message)))
}

#[utoipa::path(
    post,
    path = "/api/workouts/{id}/complete",
    params(("id" = Uuid, Path, description = "Workout id")),
    request_body(content = CompleteWorkout, description = "Optional completion details"),
    responses(
        (status = 200, description = "Workout completed", body = Workout),
        (status = 400, description = "Workout is not in progress", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn complete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
    OptionalValidatedJson(body): OptionalValidatedJson<CompleteWorkout>,
) -> Result<Json<Workout>, AppError> {
    state
        .db
        .complete_workout(auth.user_id, workout_id, &body, Utc::now().date_naive())
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Workout not found"))
}

#[utoipa::path(
    get,
    path = "/api/workouts/today",
    responses((status = 200, description = "Today's workout or suggestions", body = TodayResponse)),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodayResponse>, AppError> {
    let today = Utc::now().date_naive();

    if let Some(workout) = state.db.workout_scheduled_on(auth.user_id, today).await? {
        return Ok(Json(TodayResponse {
            has_workout: true,
            workout: Some(workout),
            suggested_templates: Vec::new(),
        }));
    }

    Ok(Json(TodayResponse {
        has_workout: false,
        workout: None,
        suggested_templates: suggested_templates(&state, auth.user_id).await?,
    }))
}

async fn suggested_templates(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<WorkoutTemplate>, AppError> {
    let favourites = state
        .db
        .top_completed_workout_types(user_id, SUGGESTED_TYPES)
        .await?;

    if favourites.is_empty() {
        return state
            .db
            .list_public_templates(None, Some(Difficulty::Beginner), MAX_SUGGESTIONS as i64)
            .await;
    }

    let mut suggestions = Vec::new();
    for workout_type in &favourites {
        suggestions.extend(
            state
                .db
                .list_public_templates(Some(workout_type), None, SUGGESTIONS_PER_TYPE)
                .await?,
        );
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    Ok(suggestions)
}

#[utoipa::path(
    get,
    path = "/api/workouts/stats",
    responses((status = 200, description = "Workout statistics", body = WorkoutStats)),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WorkoutStats>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let totals = state.db.workout_totals(auth.user_id).await?;
    let favorite_workout_type = state
        .db
        .top_completed_workout_types(auth.user_id, 1)
        .await?
        .into_iter()
        .next()
        .unwrap_or_else(|| "mixed".to_string());

    Ok(Json(WorkoutStats {
        total_workouts: totals.total_workouts,
        workouts_this_week: totals.workouts_this_week,
        workouts_this_month: totals.workouts_this_month,
        total_calories_burned: totals.total_calories_burned,
        average_duration_minutes: (totals.average_duration_minutes * 10.0).round() / 10.0,
        favorite_workout_type,
        completion_rate: completion_rate(totals.total_workouts, totals.attempted),
        current_streak: user.workout_streak,
        longest_streak: user.longest_streak,
    }))
}

#[utoipa::path(
    get,
    path = "/api/workouts/history",
    params(("days" = Option<i64>, Query, description = "Window in days (1-365, default 30)")),
    responses(
        (status = 200, description = "Completed workouts in the window", body = HistoryResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Workouts",
    security(("bearer_auth" = []))
)]
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DaysQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let since = Utc::now() - Duration::days(query.days);
    let workouts = state
        .db
        .completed_workouts_since(auth.user_id, since, None)
        .await?;
    let summary = HistorySummary::from_workouts(&workouts);

    Ok(Json(HistoryResponse {
        period_days: query.days,
        workouts,
        summary,
    }))
}
