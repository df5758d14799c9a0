//! HTTP handlers for fitness-service.

pub mod ai_content;
pub mod goals;
pub mod health;
pub mod insights;
pub mod medical;
pub mod nutrition;
pub mod templates;
pub mod usage;
pub mod users;
pub mod workouts;

use crate::models::User;
use crate::AppState;
use service_core::error::AppError;
use uuid::Uuid;

pub(crate) fn not_found(message: &'static str) -> AppError {
    AppError::NotFound(anyhow::anyhow!(message))
}

pub(crate) async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| not_found("User not found"))
}
