pub mod ai;
pub mod users;
pub mod workouts;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid email or password")]
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trailing window in days (`?days=`), 1-365, default 30.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DaysQuery {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 365, message = "days must be between 1 and 365"))]
    pub days: i64,
}

fn default_days() -> i64 {
    30
}

impl Default for DaysQuery {
    fn default() -> Self {
        Self {
            days: default_days(),
        }
    }
}
