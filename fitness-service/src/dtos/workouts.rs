use crate::models::{Workout, WorkoutTemplate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodayResponse {
    pub has_workout: bool,
    pub workout: Option<Workout>,
    /// Filled only when nothing is scheduled today.
    pub suggested_templates: Vec<WorkoutTemplate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistorySummary {
    pub total_workouts: usize,
    pub total_calories: i64,
    pub total_minutes: i64,
}

impl HistorySummary {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        Self {
            total_workouts: workouts.len(),
            total_calories: workouts
                .iter()
                .filter_map(|w| w.calories_burned)
                .map(i64::from)
                .sum(),
            total_minutes: workouts
                .iter()
                .filter_map(|w| w.actual_duration.or(w.duration_minutes))
                .map(i64::from)
                .sum(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub period_days: i64,
    pub workouts: Vec<Workout>,
    pub summary: HistorySummary,
}
