//! Generation requests and the structured content derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Kind of generated content. Also the category tag for usage accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Workout,
    Nutrition,
    HealthAnalysis,
    ExerciseInstructions,
    Motivation,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Workout => "workout",
            ContentType::Nutrition => "nutrition",
            ContentType::HealthAnalysis => "health_analysis",
            ContentType::ExerciseInstructions => "exercise_instructions",
            ContentType::Motivation => "motivation",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "workout" => Some(ContentType::Workout),
            "nutrition" => Some(ContentType::Nutrition),
            "health_analysis" => Some(ContentType::HealthAnalysis),
            "exercise_instructions" => Some(ContentType::ExerciseInstructions),
            "motivation" => Some(ContentType::Motivation),
            _ => None,
        }
    }

    /// Output token ceiling for one generation of this kind.
    pub fn max_tokens(&self) -> u32 {
        match self {
            ContentType::HealthAnalysis => 1500,
            ContentType::Workout | ContentType::Nutrition => 2000,
            ContentType::ExerciseInstructions | ContentType::Motivation => 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Processing => "processing",
            ContentStatus::Completed => "completed",
            ContentStatus::Failed => "failed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "processing" => ContentStatus::Processing,
            "completed" => ContentStatus::Completed,
            "failed" => ContentStatus::Failed,
            _ => ContentStatus::Pending,
        }
    }
}

/// One row per generation call.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ContentRequest {
    pub request_id: Uuid,
    pub user_id: Uuid,
    pub content_type: String,
    pub status: String,
    #[schema(value_type = Object)]
    pub user_context: serde_json::Value,
    #[schema(value_type = Object)]
    pub prompt_context: serde_json::Value,
    pub generated_content: Option<String>,
    pub tokens_used: i64,
    pub generation_time_seconds: Option<f64>,
    pub user_rating: Option<i32>,
    pub user_feedback: Option<String>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ContentRequest {
    pub fn status(&self) -> ContentStatus {
        ContentStatus::from_string(&self.status)
    }
}

/// Input for creating a content request.
#[derive(Debug, Clone)]
pub struct CreateContentRequest {
    pub user_id: Uuid,
    pub content_type: ContentType,
    pub status: ContentStatus,
    pub user_context: serde_json::Value,
    pub prompt_context: serde_json::Value,
}

/// Filter parameters for listing content requests.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListContentRequestsFilter {
    pub content_type: Option<ContentType>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct NutritionPlan {
    pub plan_id: Uuid,
    pub user_id: Uuid,
    pub ai_request_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub content: String,
    pub daily_calories: Option<i32>,
    pub protein_grams: Option<i32>,
    pub carbs_grams: Option<i32>,
    pub fats_grams: Option<i32>,
    #[schema(value_type = Object)]
    pub meal_plan: serde_json::Value,
    #[schema(value_type = Object)]
    pub shopping_list: serde_json::Value,
    pub preparation_tips: String,
    pub duration_days: i32,
    pub is_active: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a nutrition plan.
#[derive(Debug, Clone)]
pub struct CreateNutritionPlan {
    pub user_id: Uuid,
    pub ai_request_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub content: String,
    pub duration_days: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNutritionPlan {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 500, max = 10000, message = "Daily calories must be 500-10000"))]
    pub daily_calories: Option<i32>,
    #[validate(range(min = 0, max = 1000))]
    pub protein_grams: Option<i32>,
    #[validate(range(min = 0, max = 2000))]
    pub carbs_grams: Option<i32>,
    #[validate(range(min = 0, max = 1000))]
    pub fats_grams: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub meal_plan: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub shopping_list: Option<serde_json::Value>,
    #[validate(length(max = 5000))]
    pub preparation_tips: Option<String>,
    #[validate(range(min = 1, max = 90))]
    pub duration_days: Option<i32>,
    pub is_active: Option<bool>,
}

/// Filter parameters for listing nutrition plans.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListNutritionPlansFilter {
    pub active_only: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    General,
    Fitness,
    Nutrition,
    Sleep,
    Stress,
    Recovery,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::General => "general",
            InsightType::Fitness => "fitness",
            InsightType::Nutrition => "nutrition",
            InsightType::Sleep => "sleep",
            InsightType::Stress => "stress",
            InsightType::Recovery => "recovery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InsightPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl InsightPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightPriority::Low => "low",
            InsightPriority::Medium => "medium",
            InsightPriority::High => "high",
            InsightPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HealthInsight {
    pub insight_id: Uuid,
    pub user_id: Uuid,
    pub ai_request_id: Option<Uuid>,
    pub insight_type: String,
    pub priority: String,
    pub title: String,
    pub content: String,
    #[schema(value_type = Object)]
    pub recommendations: serde_json::Value,
    #[schema(value_type = Object)]
    pub data_sources: serde_json::Value,
    pub confidence_score: Option<f64>,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub user_rating: Option<i32>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating a health insight.
#[derive(Debug, Clone)]
pub struct CreateHealthInsight {
    pub user_id: Uuid,
    pub ai_request_id: Option<Uuid>,
    pub insight_type: InsightType,
    pub priority: InsightPriority,
    pub title: String,
    pub content: String,
    pub data_sources: serde_json::Value,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateHealthInsight {
    pub is_read: Option<bool>,
    pub is_dismissed: Option<bool>,
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub user_rating: Option<i32>,
}

/// Filter parameters for listing insights. Dismissed insights are never listed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListInsightsFilter {
    pub insight_type: Option<InsightType>,
    pub priority: Option<InsightPriority>,
    pub unread_only: Option<bool>,
}
