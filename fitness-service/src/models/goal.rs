//! Measurable fitness goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Endurance,
    Strength,
    Flexibility,
    GeneralFitness,
    SportSpecific,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight_loss",
            GoalType::MuscleGain => "muscle_gain",
            GoalType::Endurance => "endurance",
            GoalType::Strength => "strength",
            GoalType::Flexibility => "flexibility",
            GoalType::GeneralFitness => "general_fitness",
            GoalType::SportSpecific => "sport_specific",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutGoal {
    pub goal_id: Uuid,
    pub user_id: Uuid,
    pub goal_type: String,
    pub description: String,
    pub target_value: Option<f64>,
    pub unit: String,
    pub target_date: Option<NaiveDate>,
    pub is_active: bool,
    pub achieved_utc: Option<DateTime<Utc>>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutGoal {
    pub goal_type: GoalType,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub target_value: Option<f64>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub unit: String,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkoutGoal {
    pub goal_type: Option<GoalType>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub target_value: Option<f64>,
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    /// Marks the goal achieved now; also deactivates it.
    pub achieved: Option<bool>,
}

/// Filter parameters for listing goals.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListGoalsFilter {
    pub active_only: Option<bool>,
}
