//! Exercise catalogue, workout templates and workouts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Hiit,
    Yoga,
    Pilates,
    Stretching,
    Mixed,
    Sports,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Hiit => "hiit",
            WorkoutType::Yoga => "yoga",
            WorkoutType::Pilates => "pilates",
            WorkoutType::Stretching => "stretching",
            WorkoutType::Mixed => "mixed",
            WorkoutType::Sports => "sports",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "Strength Training",
            WorkoutType::Cardio => "Cardio",
            WorkoutType::Hiit => "HIIT",
            WorkoutType::Yoga => "Yoga",
            WorkoutType::Pilates => "Pilates",
            WorkoutType::Stretching => "Stretching",
            WorkoutType::Mixed => "Mixed",
            WorkoutType::Sports => "Sports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Scheduled,
    InProgress,
    Completed,
    Skipped,
    Cancelled,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Skipped => "skipped",
            WorkoutStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "in_progress" => WorkoutStatus::InProgress,
            "completed" => WorkoutStatus::Completed,
            "skipped" => WorkoutStatus::Skipped,
            "cancelled" => WorkoutStatus::Cancelled,
            _ => WorkoutStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub muscle_groups: Vec<String>,
    pub equipment: String,
    pub difficulty: String,
    pub calories_per_minute: f64,
    pub created_utc: DateTime<Utc>,
}

/// Filter parameters for the exercise catalogue.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListExercisesFilter {
    pub muscle_group: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutTemplate {
    pub template_id: Uuid,
    pub name: String,
    pub description: String,
    pub workout_type: String,
    pub difficulty: String,
    pub estimated_duration: i32,
    pub intensity_level: i32,
    pub equipment_needed: Vec<String>,
    pub space_required: String,
    pub created_by: Option<Uuid>,
    pub is_public: bool,
    pub is_ai_generated: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl WorkoutTemplate {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == Some(user_id)
    }

    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutTemplate {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    pub workout_type: WorkoutType,
    pub difficulty: Difficulty,
    #[validate(range(min = 5, max = 240, message = "Estimated duration must be 5-240 minutes"))]
    pub estimated_duration: i32,
    #[validate(range(min = 1, max = 10, message = "Intensity must be 1-10"))]
    #[serde(default = "default_intensity")]
    pub intensity_level: i32,
    #[serde(default)]
    pub equipment_needed: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(default = "default_space")]
    pub space_required: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_intensity() -> i32 {
    5
}

fn default_space() -> String {
    "minimal".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkoutTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub workout_type: Option<WorkoutType>,
    pub difficulty: Option<Difficulty>,
    #[validate(range(min = 5, max = 240))]
    pub estimated_duration: Option<i32>,
    #[validate(range(min = 1, max = 10))]
    pub intensity_level: Option<i32>,
    pub equipment_needed: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub space_required: Option<String>,
    pub is_public: Option<bool>,
}

/// Filter parameters for listing templates.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListTemplatesFilter {
    pub workout_type: Option<WorkoutType>,
    pub difficulty: Option<Difficulty>,
    pub max_duration: Option<i32>,
}

/// Workout row. `duration_minutes` is derived from the start/finish times.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Workout {
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub template_id: Option<Uuid>,
    pub name: String,
    pub workout_type: Option<String>,
    pub status: String,
    pub scheduled_date: NaiveDate,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub actual_duration: Option<i32>,
    pub calories_burned: Option<i32>,
    pub average_heart_rate: Option<i32>,
    pub max_heart_rate: Option<i32>,
    pub perceived_exertion: Option<i32>,
    pub user_rating: Option<i32>,
    pub notes: String,
    #[schema(value_type = Option<Object>)]
    pub ai_prompt_context: Option<serde_json::Value>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Workout {
    pub fn status(&self) -> WorkoutStatus {
        WorkoutStatus::from_string(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWorkout {
    pub template_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub workout_type: Option<WorkoutType>,
    pub scheduled_date: NaiveDate,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub notes: String,
}

/// Resolved input for inserting a workout row.
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub template_id: Option<Uuid>,
    pub name: String,
    pub workout_type: Option<String>,
    pub scheduled_date: NaiveDate,
    pub notes: String,
    pub ai_prompt_context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkout {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    /// Only `scheduled`, `skipped` or `cancelled`; start/complete have their own endpoints.
    pub status: Option<WorkoutStatus>,
    #[validate(range(min = 1, max = 10))]
    pub perceived_exertion: Option<i32>,
    #[validate(range(min = 1, max = 5))]
    pub user_rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CompleteWorkout {
    #[validate(range(min = 0, max = 600))]
    pub actual_duration: Option<i32>,
    #[validate(range(min = 0, max = 10000))]
    pub calories_burned: Option<i32>,
    #[validate(range(min = 30, max = 250))]
    pub average_heart_rate: Option<i32>,
    #[validate(range(min = 30, max = 250))]
    pub max_heart_rate: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Perceived exertion must be 1-10"))]
    pub perceived_exertion: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "Rating must be 1-5"))]
    pub user_rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Filter parameters for listing workouts.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListWorkoutsFilter {
    pub status: Option<WorkoutStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Streak after completing a workout today.
///
/// A completion yesterday extends the run; otherwise a new run starts at 1.
pub fn next_streak(current: i32, completed_yesterday: bool) -> i32 {
    if completed_yesterday {
        current + 1
    } else {
        1
    }
}

/// Name for a workout scheduled without one.
pub fn default_workout_name(workout_type: Option<WorkoutType>, date: NaiveDate) -> String {
    match workout_type {
        Some(t) => format!("{} Workout - {}", t.display_name(), date.format("%Y-%m-%d")),
        None => format!("Workout - {}", date.format("%Y-%m-%d")),
    }
}

/// Completed share of all attempted (non-scheduled) workouts, in percent.
pub fn completion_rate(completed: i64, attempted: i64) -> f64 {
    if attempted <= 0 {
        return 0.0;
    }
    ((completed as f64 / attempted as f64) * 1000.0).round() / 10.0
}

/// Aggregates returned by the workout stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutStats {
    pub total_workouts: i64,
    pub workouts_this_week: i64,
    pub workouts_this_month: i64,
    pub total_calories_burned: i64,
    pub average_duration_minutes: f64,
    #[schema(example = "strength")]
    pub favorite_workout_type: String,
    pub completion_rate: f64,
    pub current_streak: i32,
    pub longest_streak: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_streak() {
        assert_eq!(next_streak(4, true), 5);
        assert_eq!(next_streak(4, false), 1);
        assert_eq!(next_streak(0, false), 1);
    }

    #[test]
    fn test_default_workout_name() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        assert_eq!(
            default_workout_name(Some(WorkoutType::Hiit), date),
            "HIIT Workout - 2024-07-04"
        );
        assert_eq!(default_workout_name(None, date), "Workout - 2024-07-04");
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(2, 3), 66.7);
        assert_eq!(completion_rate(5, 5), 100.0);
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!(WorkoutStatus::from_string("in_progress"), WorkoutStatus::InProgress);
        assert_eq!(WorkoutStatus::InProgress.as_str(), "in_progress");
        assert_eq!(WorkoutStatus::from_string("bogus"), WorkoutStatus::Scheduled);
    }

    #[test]
    fn test_template_visibility() {
        let owner = Uuid::new_v4();
        let mut template = WorkoutTemplate {
            template_id: Uuid::new_v4(),
            name: "Private session".to_string(),
            description: String::new(),
            workout_type: "strength".to_string(),
            difficulty: "beginner".to_string(),
            estimated_duration: 30,
            intensity_level: 5,
            equipment_needed: vec![],
            space_required: "minimal".to_string(),
            created_by: Some(owner),
            is_public: false,
            is_ai_generated: false,
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        };

        assert!(template.is_visible_to(owner));
        assert!(!template.is_visible_to(Uuid::new_v4()));

        template.is_public = true;
        assert!(template.is_visible_to(Uuid::new_v4()));
        assert!(!template.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_create_template_defaults() {
        let body: CreateWorkoutTemplate = serde_json::from_value(serde_json::json!({
            "name": "Leg day",
            "workout_type": "strength",
            "difficulty": "intermediate",
            "estimated_duration": 40
        }))
        .unwrap();

        assert_eq!(body.intensity_level, 5);
        assert_eq!(body.space_required, "minimal");
        assert!(body.is_public);
        assert!(body.validate().is_ok());
    }
}
