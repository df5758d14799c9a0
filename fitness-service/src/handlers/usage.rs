use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::dtos::ai::DailyUsageResponse;
use crate::dtos::DaysQuery;
use crate::middleware::AuthUser;
use crate::models::UsageSummary;
use crate::utils::ValidatedQuery;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/ai/usage-stats",
    params(("days" = Option<i64>, Query, description = "Window in days (1-365, default 30)")),
    responses(
        (status = 200, description = "Usage totals for the window", body = UsageSummary),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn usage_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DaysQuery>,
) -> Result<Json<UsageSummary>, AppError> {
    Ok(Json(state.usage.summary(auth.user_id, query.days).await?))
}

#[utoipa::path(
    get,
    path = "/api/ai/usage-stats/daily",
    params(("days" = Option<i64>, Query, description = "Window in days (1-365, default 30)")),
    responses(
        (status = 200, description = "Daily usage rows, newest first", body = DailyUsageResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "AI",
    security(("bearer_auth" = []))
)]
pub async fn daily_usage(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<DaysQuery>,
) -> Result<Json<DailyUsageResponse>, AppError> {
    let daily_stats = state.usage.daily(auth.user_id, query.days).await?;
    Ok(Json(DailyUsageResponse {
        period_days: query.days,
        daily_stats,
    }))
}
