use crate::models::{MedicalRecord, SanitizedUser, UserProfile, WorkoutGoal};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: SanitizedUser,
    pub token: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FitnessGoalsRequest {
    #[validate(length(max = 20, message = "At most 20 goals"))]
    pub fitness_goals: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub user: SanitizedUser,
    pub profile: UserProfile,
    pub active_goals: Vec<WorkoutGoal>,
    pub recent_medical_records: Vec<MedicalRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserStatsResponse {
    pub workout_streak: i32,
    pub longest_streak: i32,
    pub last_workout_date: Option<NaiveDate>,
    pub bmi: Option<f64>,
    pub active_goals: i64,
    pub medical_records: i64,
    pub member_since: DateTime<Utc>,
}

/// One rule-based health tip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthTip {
    #[serde(rename = "type")]
    #[schema(example = "sleep")]
    pub tip_type: String,
    #[schema(example = "medium")]
    pub priority: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthTipsResponse {
    pub insights: Vec<HealthTip>,
    pub total_insights: usize,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register(password_confirm: &str) -> RegisterRequest {
        serde_json::from_value(json!({
            "email": "jane@example.com",
            "username": "jane",
            "password": "s3cure-pass",
            "password_confirm": password_confirm
        }))
        .unwrap()
    }

    #[test]
    fn test_register_passwords_must_match() {
        assert!(register("s3cure-pass").validate().is_ok());

        let errors = register("different").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirm"));
    }

    #[test]
    fn test_register_rejects_bad_email_and_short_password() {
        let body: RegisterRequest = serde_json::from_value(json!({
            "email": "not-an-email",
            "username": "jane",
            "password": "short",
            "password_confirm": "short"
        }))
        .unwrap();

        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_health_tip_serializes_type_field() {
        let tip = HealthTip {
            tip_type: "sleep".to_string(),
            priority: "medium".to_string(),
            title: "Sleep".to_string(),
            message: "More sleep".to_string(),
        };
        let value = serde_json::to_value(tip).unwrap();
        assert_eq!(value["type"], "sleep");
    }
}
