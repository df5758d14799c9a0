use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use service_core::error::AppError;

use super::{load_user, not_found};
use crate::dtos::users::{
    DashboardResponse, FitnessGoalsRequest, HealthTipsResponse, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse, UserStatsResponse,
};
use crate::dtos::MessageResponse;
use crate::middleware::AuthUser;
use crate::models::{
    CreateUser, ListGoalsFilter, SanitizedUser, UpdateUser, UpdateUserProfile, UserProfile,
};
use crate::services::health_tips::health_tips;
use crate::utils::{
    generate_token, hash_password, hash_token, verify_password, Password, ValidatedJson,
};
use crate::AppState;

const RECENT_RECORDS: i64 = 5;

#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password_hash = hash_password(&Password::new(body.password))?;

    let user = state
        .db
        .create_user(&CreateUser {
            email: body.email.trim().to_lowercase(),
            username: body.username.trim().to_string(),
            password_hash,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;

    state.db.get_or_create_profile(user.user_id).await?;

    let token = generate_token();
    state
        .db
        .create_auth_token(user.user_id, &hash_token(&token))
        .await?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.sanitized(),
            token,
            message: "User registered successfully".to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many attempts", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || AppError::Unauthorized(anyhow::anyhow!("Invalid email or password"));

    let user = state
        .db
        .get_user_by_email(body.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&Password::new(body.password), &user.password_hash)? {
        tracing::warn!(user_id = %user.user_id, "Failed login attempt");
        return Err(invalid());
    }

    let token = generate_token();
    state
        .db
        .create_auth_token(user.user_id, &hash_token(&token))
        .await?;

    Ok(Json(LoginResponse {
        user_id: user.user_id,
        email: user.email,
        token,
        message: "Login successful".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/logout",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.delete_auth_token(&auth.token_hash).await?;
    Ok(Json(MessageResponse::new("Successfully logged out")))
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "Own account", body = SanitizedUser),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SanitizedUser>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    Ok(Json(user.sanitized()))
}

#[utoipa::path(
    patch,
    path = "/api/users/profile",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated account", body = SanitizedUser),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<UpdateUser>,
) -> Result<Json<SanitizedUser>, AppError> {
    let user = state
        .db
        .update_user(auth.user_id, &body)
        .await?
        .ok_or_else(|| not_found("User not found"))?;
    Ok(Json(user.sanitized()))
}

#[utoipa::path(
    get,
    path = "/api/users/profile/details",
    responses((status = 200, description = "Extended profile", body = UserProfile)),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_profile_details(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.db.get_or_create_profile(auth.user_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/users/profile/details",
    request_body = UpdateUserProfile,
    responses(
        (status = 200, description = "Updated extended profile", body = UserProfile),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_profile_details(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<UpdateUserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.db.update_profile(auth.user_id, &body).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/fitness-goals",
    request_body = FitnessGoalsRequest,
    responses(
        (status = 200, description = "Goals replaced", body = SanitizedUser),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_fitness_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<FitnessGoalsRequest>,
) -> Result<Json<SanitizedUser>, AppError> {
    let goals: Vec<String> = body
        .fitness_goals
        .iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();

    let user = state
        .db
        .set_fitness_goals(auth.user_id, &goals)
        .await?
        .ok_or_else(|| not_found("User not found"))?;
    Ok(Json(user.sanitized()))
}

#[utoipa::path(
    get,
    path = "/api/users/dashboard",
    responses((status = 200, description = "Profile summary, active goals and recent vitals", body = DashboardResponse)),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let profile = state.db.get_or_create_profile(auth.user_id).await?;
    let active_goals = state
        .db
        .list_goals(
            auth.user_id,
            &ListGoalsFilter {
                active_only: Some(true),
            },
        )
        .await?;
    let recent_medical_records = state
        .db
        .list_medical_records(auth.user_id, Some(RECENT_RECORDS))
        .await?;

    Ok(Json(DashboardResponse {
        user: user.sanitized(),
        profile,
        active_goals,
        recent_medical_records,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/stats",
    responses((status = 200, description = "Streaks, BMI and counts", body = UserStatsResponse)),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn user_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserStatsResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let active_goals = state.db.count_active_goals(auth.user_id).await?;
    let medical_records = state.db.count_medical_records(auth.user_id).await?;

    Ok(Json(UserStatsResponse {
        workout_streak: user.workout_streak,
        longest_streak: user.longest_streak,
        last_workout_date: user.last_workout_date,
        bmi: user.bmi(),
        active_goals,
        medical_records,
        member_since: user.created_utc,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/health-insights",
    responses((status = 200, description = "Rule-based tips from the latest vitals and BMI", body = HealthTipsResponse)),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn health_insights(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HealthTipsResponse>, AppError> {
    let user = load_user(&state, auth.user_id).await?;
    let latest = state.db.latest_medical_record(auth.user_id).await?;

    let insights = health_tips(latest.as_ref(), user.bmi());
    let last_updated = latest.map(|r| r.created_utc).unwrap_or_else(Utc::now);

    Ok(Json(HealthTipsResponse {
        total_insights: insights.len(),
        insights,
        last_updated,
    }))
}
