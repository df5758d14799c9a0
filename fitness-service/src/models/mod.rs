//! Domain models for fitness-service.

mod content;
mod goal;
mod medical;
mod profile;
mod usage;
mod user;
mod workout;

pub use content::{
    ContentRequest, ContentStatus, ContentType, CreateContentRequest, CreateHealthInsight,
    CreateNutritionPlan, HealthInsight, InsightPriority, InsightType, ListContentRequestsFilter,
    ListInsightsFilter, ListNutritionPlansFilter, NutritionPlan, UpdateHealthInsight,
    UpdateNutritionPlan,
};
pub use goal::{CreateWorkoutGoal, GoalType, ListGoalsFilter, UpdateWorkoutGoal, WorkoutGoal};
pub use medical::{CreateMedicalRecord, MedicalRecord, UpdateMedicalRecord};
pub use profile::{UpdateUserProfile, UserProfile};
pub use usage::{smoothed_average, RequestBreakdown, UsageEvent, UsageStat, UsageSummary};
pub use user::{
    bmi, split_csv, ActivityLevel, CreateUser, FitnessLevel, Gender, ProfileVisibility,
    SanitizedUser, UpdateUser, User,
};
pub use workout::{
    completion_rate, default_workout_name, next_streak, CompleteWorkout, CreateWorkout,
    CreateWorkoutTemplate, Difficulty, Exercise, ListExercisesFilter, ListTemplatesFilter,
    ListWorkoutsFilter, NewWorkout, UpdateWorkout, UpdateWorkoutTemplate, Workout, WorkoutStats,
    WorkoutStatus, WorkoutTemplate, WorkoutType,
};
