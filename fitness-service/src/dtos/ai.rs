use crate::models::{Difficulty, UsageStat, WorkoutType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateWorkoutRequest {
    #[validate(custom(function = "validate_generated_workout_type"))]
    pub workout_type: WorkoutType,
    #[serde(default = "default_duration")]
    #[validate(range(min = 10, max = 120, message = "Duration must be 10-120 minutes"))]
    pub duration_minutes: i32,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub equipment_available: Vec<String>,
    #[serde(default)]
    pub target_muscle_groups: Vec<String>,
    #[serde(default)]
    pub specific_goals: Vec<String>,
    #[serde(default)]
    pub exclude_exercises: Vec<String>,
    #[validate(length(max = 500, message = "Custom requirements must be at most 500 characters"))]
    pub custom_requirements: Option<String>,
}

fn default_duration() -> i32 {
    30
}

fn default_difficulty() -> Difficulty {
    Difficulty::Intermediate
}

/// Stretching and sports sessions are not generated.
fn validate_generated_workout_type(value: &WorkoutType) -> Result<(), ValidationError> {
    match value {
        WorkoutType::Strength
        | WorkoutType::Cardio
        | WorkoutType::Hiit
        | WorkoutType::Yoga
        | WorkoutType::Pilates
        | WorkoutType::Mixed => Ok(()),
        WorkoutType::Stretching | WorkoutType::Sports => {
            let mut err = ValidationError::new("unsupported_workout_type");
            err.message = Some("Workout type cannot be generated".into());
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Low,
    Medium,
    High,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "low",
            BudgetLevel::Medium => "medium",
            BudgetLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CookingTime {
    Minimal,
    Moderate,
    Extensive,
}

impl CookingTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTime::Minimal => "minimal",
            CookingTime::Moderate => "moderate",
            CookingTime::Extensive => "extensive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateNutritionRequest {
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub preferred_foods: Vec<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default = "default_meal_count")]
    #[validate(range(min = 3, max = 6, message = "Meal count must be 3-6"))]
    pub meal_count: i32,
    #[serde(default = "default_plan_duration")]
    #[validate(range(min = 1, max = 30, message = "Plan duration must be 1-30 days"))]
    pub plan_duration_days: i32,
    #[serde(default = "default_budget")]
    pub budget_level: BudgetLevel,
    #[serde(default = "default_cooking_time")]
    pub cooking_time: CookingTime,
}

fn default_meal_count() -> i32 {
    3
}

fn default_plan_duration() -> i32 {
    7
}

fn default_budget() -> BudgetLevel {
    BudgetLevel::Medium
}

fn default_cooking_time() -> CookingTime {
    CookingTime::Moderate
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnalyzeHealthRequest {
    #[serde(default = "default_true")]
    pub include_medical_data: bool,
    #[serde(default = "default_true")]
    pub include_workout_data: bool,
    #[serde(default)]
    pub include_nutrition_data: bool,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[validate(length(max = 1000, message = "Specific concerns must be at most 1000 characters"))]
    pub specific_concerns: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub message: String,
    pub rating: i32,
}

/// Result of a generation endpoint. Always returned with HTTP 200.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationResponse {
    pub success: bool,
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Id of the record created from the content.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub structured_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyUsageResponse {
    pub period_days: i64,
    pub daily_stats: Vec<UsageStat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workout_request_defaults() {
        let body: GenerateWorkoutRequest =
            serde_json::from_value(json!({ "workout_type": "strength" })).unwrap();

        assert_eq!(body.duration_minutes, 30);
        assert_eq!(body.difficulty_level, Difficulty::Intermediate);
        assert!(body.equipment_available.is_empty());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_workout_duration_out_of_range() {
        let body: GenerateWorkoutRequest = serde_json::from_value(json!({
            "workout_type": "cardio",
            "duration_minutes": 5
        }))
        .unwrap();

        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_minutes"));
    }

    #[test]
    fn test_stretching_cannot_be_generated() {
        let body: GenerateWorkoutRequest =
            serde_json::from_value(json!({ "workout_type": "stretching" })).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_nutrition_request_defaults_and_range() {
        let body: GenerateNutritionRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.meal_count, 3);
        assert_eq!(body.plan_duration_days, 7);
        assert_eq!(body.budget_level, BudgetLevel::Medium);
        assert_eq!(body.cooking_time, CookingTime::Moderate);
        assert!(body.validate().is_ok());

        let too_many: GenerateNutritionRequest =
            serde_json::from_value(json!({ "meal_count": 7 })).unwrap();
        let errors = too_many.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("meal_count"));
    }

    #[test]
    fn test_health_request_defaults() {
        let body: AnalyzeHealthRequest = serde_json::from_value(json!({})).unwrap();
        assert!(body.include_medical_data);
        assert!(body.include_workout_data);
        assert!(!body.include_nutrition_data);
    }

    #[test]
    fn test_feedback_rating_bounds() {
        for rating in [0, 6] {
            let body = FeedbackRequest {
                rating,
                feedback: None,
            };
            assert!(body.validate().is_err(), "rating {} should be rejected", rating);
        }
        let ok = FeedbackRequest {
            rating: 5,
            feedback: Some("Great plan".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_failure_response_omits_content() {
        let response = GenerationResponse {
            success: false,
            request_id: Uuid::nil(),
            content: None,
            structured_data: None,
            tokens_used: None,
            generation_time: None,
            error_message: Some("AI service temporarily unavailable".to_string()),
        };
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("content").is_none());
    }
}
