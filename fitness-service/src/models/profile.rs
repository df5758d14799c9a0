//! Extended profile details (one row per user, created on first access).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub bio: String,
    pub location: String,
    #[schema(example = "UTC")]
    pub timezone: String,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub workout_reminders: bool,
    pub is_coach: bool,
    pub coach_certification: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserProfile {
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub timezone: Option<String>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub workout_reminders: Option<bool>,
    pub is_coach: Option<bool>,
    #[validate(length(max = 200))]
    pub coach_certification: Option<String>,
}
