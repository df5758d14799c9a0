//! Prompt builders for the three generation endpoints.

use crate::dtos::ai::{AnalyzeHealthRequest, GenerateNutritionRequest, GenerateWorkoutRequest};
use crate::models::{MedicalRecord, User, Workout};
use serde::Serialize;
use std::fmt::Display;

/// The profile facts sent to the model. Stored as the request's user context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileContext {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub fitness_level: String,
    pub activity_level: String,
    pub goals: Vec<String>,
    pub preferred_workout_duration: i32,
    pub equipment: Vec<String>,
    pub dietary_restrictions: Option<String>,
}

impl ProfileContext {
    pub fn from_user(user: &User) -> Self {
        Self {
            age: user.age(),
            gender: user.gender().map(|g| g.display_name().to_string()),
            height_cm: user.height_cm,
            weight_kg: user.weight_kg,
            bmi: user.bmi(),
            fitness_level: user.fitness_level().display_name().to_string(),
            activity_level: user.activity_level().display_name().to_string(),
            goals: user.fitness_goals.0.clone(),
            preferred_workout_duration: user.preferred_workout_duration,
            equipment: user.equipment_list(),
            dietary_restrictions: Some(user.dietary_restrictions.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    fn write_profile(&self, out: &mut String) {
        out.push_str("User Profile:\n");
        line(out, "Age", or_default(self.age, "Not specified"));
        line(out, "Gender", or_default(self.gender.as_deref(), "Not specified"));
        line(
            out,
            "Height",
            self.height_cm
                .map(|h| format!("{h} cm"))
                .unwrap_or_else(|| "Not specified".to_string()),
        );
        line(
            out,
            "Weight",
            self.weight_kg
                .map(|w| format!("{w} kg"))
                .unwrap_or_else(|| "Not specified".to_string()),
        );
        line(out, "BMI", or_default(self.bmi, "Not specified"));
        line(out, "Fitness Level", &self.fitness_level);
        line(out, "Activity Level", &self.activity_level);
        line(out, "Fitness Goals", list_or(&self.goals, "Not specified"));
    }
}

pub fn workout_prompt(profile: &ProfileContext, params: &GenerateWorkoutRequest) -> String {
    let mut out = String::from(
        "You are a certified fitness instructor creating a personalized workout plan.\n\n",
    );
    profile.write_profile(&mut out);

    // Request equipment wins over the profile's
    let equipment = if params.equipment_available.is_empty() {
        &profile.equipment
    } else {
        &params.equipment_available
    };

    out.push_str("\nWorkout Request:\n");
    line(&mut out, "Workout Type", params.workout_type.display_name());
    line(&mut out, "Duration", format!("{} minutes", params.duration_minutes));
    line(&mut out, "Difficulty", params.difficulty_level.display_name());
    line(&mut out, "Available Equipment", list_or(equipment, "None"));
    line(&mut out, "Target Muscle Groups", list_or(&params.target_muscle_groups, "Not specified"));
    line(&mut out, "Specific Goals", list_or(&params.specific_goals, "Not specified"));
    line(&mut out, "Exercises to Avoid", list_or(&params.exclude_exercises, "None"));
    line(
        &mut out,
        "Additional Requirements",
        or_default(params.custom_requirements.as_deref().filter(|s| !s.trim().is_empty()), "None"),
    );

    out.push_str(
        "\nPlease create a detailed workout plan with:\n\
         1. Warm-up (5-10 minutes)\n\
         2. Main workout with specific exercises, sets, reps and rest periods\n\
         3. Cool-down and stretching (5-10 minutes)\n\
         4. Safety considerations and modifications\n\
         5. Progress tracking suggestions\n\n\
         Format the response as a structured workout plan with clear instructions.\n",
    );
    out
}

pub fn nutrition_prompt(profile: &ProfileContext, params: &GenerateNutritionRequest) -> String {
    let mut out = String::from(
        "You are a registered dietitian creating a personalized nutrition plan.\n\n",
    );
    profile.write_profile(&mut out);

    let mut restrictions = params.dietary_restrictions.clone();
    if restrictions.is_empty() {
        if let Some(profile_restrictions) = &profile.dietary_restrictions {
            restrictions.push(profile_restrictions.clone());
        }
    }

    out.push_str("\nNutrition Request:\n");
    line(&mut out, "Nutrition Goals", list_or(&params.goals, "Not specified"));
    line(&mut out, "Dietary Restrictions", list_or(&restrictions, "None"));
    line(&mut out, "Food Allergies", list_or(&params.allergies, "None"));
    line(&mut out, "Preferred Foods", list_or(&params.preferred_foods, "Not specified"));
    line(&mut out, "Disliked Foods", list_or(&params.disliked_foods, "None"));
    line(&mut out, "Meals per Day", params.meal_count);
    line(&mut out, "Plan Duration", format!("{} days", params.plan_duration_days));
    line(&mut out, "Budget", params.budget_level.as_str());
    line(&mut out, "Cooking Time", params.cooking_time.as_str());

    out.push_str(
        "\nPlease provide:\n\
         1. Daily calorie target and macronutrient breakdown\n\
         2. A meal plan for each day with portion sizes\n\
         3. A shopping list\n\
         4. Meal preparation tips\n\
         5. Hydration recommendations\n",
    );
    out
}

pub fn health_analysis_prompt(
    profile: &ProfileContext,
    vitals: Option<&MedicalRecord>,
    recent_workouts: &[Workout],
    params: &AnalyzeHealthRequest,
) -> String {
    let mut out = String::from(
        "You are a health and wellness advisor reviewing a user's recent health data. \
         Do not provide a medical diagnosis.\n\n",
    );
    profile.write_profile(&mut out);

    out.push_str("\nHealth Data:\n");
    line(
        &mut out,
        "Resting Heart Rate",
        vitals
            .and_then(|v| v.resting_heart_rate)
            .map(|hr| format!("{hr} bpm"))
            .unwrap_or_else(|| "Not provided".to_string()),
    );
    line(
        &mut out,
        "Blood Pressure",
        vitals
            .and_then(|v| Some(format!("{}/{}", v.blood_pressure_systolic?, v.blood_pressure_diastolic?)))
            .unwrap_or_else(|| "Not provided".to_string()),
    );
    line(
        &mut out,
        "Sleep",
        vitals
            .and_then(|v| v.sleep_hours)
            .map(|h| format!("{h} hours"))
            .unwrap_or_else(|| "Not provided".to_string()),
    );
    line(
        &mut out,
        "Stress Level",
        vitals
            .and_then(|v| v.stress_level)
            .map(|s| format!("{s}/10"))
            .unwrap_or_else(|| "Not provided".to_string()),
    );
    line(
        &mut out,
        "Energy Level",
        vitals
            .and_then(|v| v.energy_level)
            .map(|e| format!("{e}/10"))
            .unwrap_or_else(|| "Not provided".to_string()),
    );

    out.push_str("\nRecent Workouts:\n");
    if recent_workouts.is_empty() {
        out.push_str("- None\n");
    }
    for workout in recent_workouts {
        let minutes = workout
            .actual_duration
            .or(workout.duration_minutes)
            .map(|m| format!("{m} min"))
            .unwrap_or_else(|| "duration not recorded".to_string());
        out.push_str(&format!(
            "- {} on {} ({})\n",
            workout.name, workout.scheduled_date, minutes
        ));
    }

    out.push('\n');
    line(&mut out, "Focus Areas", list_or(&params.focus_areas, "General health"));
    line(
        &mut out,
        "Specific Concerns",
        or_default(params.specific_concerns.as_deref().filter(|s| !s.trim().is_empty()), "None"),
    );

    out.push_str(
        "\nPlease provide:\n\
         1. An overall health assessment\n\
         2. Areas of concern, if any\n\
         3. Lifestyle recommendations\n\
         4. When to consult a healthcare professional\n",
    );
    out
}

fn line(out: &mut String, label: &str, value: impl Display) {
    out.push_str(&format!("- {label}: {value}\n"));
}

fn or_default<T: Display>(value: Option<T>, default: &str) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| default.to_string())
}

fn list_or(items: &[String], default: &str) -> String {
    let items: Vec<&str> = items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if items.is_empty() {
        default.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn profile() -> ProfileContext {
        ProfileContext {
            fitness_level: "Beginner".to_string(),
            activity_level: "Moderately Active".to_string(),
            preferred_workout_duration: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_workout_prompt_defaults() {
        let params: GenerateWorkoutRequest =
            serde_json::from_value(json!({ "workout_type": "hiit" })).unwrap();

        let prompt = workout_prompt(&profile(), &params);

        assert!(prompt.contains("- Age: Not specified"));
        assert!(prompt.contains("- Workout Type: HIIT"));
        assert!(prompt.contains("- Duration: 30 minutes"));
        assert!(prompt.contains("- Difficulty: Intermediate"));
        assert!(prompt.contains("- Available Equipment: None"));
        assert!(prompt.contains("- Target Muscle Groups: Not specified"));
        assert!(prompt.contains("- Additional Requirements: None"));
    }

    #[test]
    fn test_workout_prompt_prefers_request_equipment() {
        let mut context = profile();
        context.equipment = vec!["treadmill".to_string()];
        let params: GenerateWorkoutRequest = serde_json::from_value(json!({
            "workout_type": "strength",
            "equipment_available": ["dumbbells", " ", "bench"]
        }))
        .unwrap();

        let prompt = workout_prompt(&context, &params);
        assert!(prompt.contains("- Available Equipment: dumbbells, bench"));

        let params: GenerateWorkoutRequest =
            serde_json::from_value(json!({ "workout_type": "strength" })).unwrap();
        let prompt = workout_prompt(&context, &params);
        assert!(prompt.contains("- Available Equipment: treadmill"));
    }

    #[test]
    fn test_nutrition_prompt_defaults() {
        let params: GenerateNutritionRequest = serde_json::from_value(json!({})).unwrap();

        let prompt = nutrition_prompt(&profile(), &params);

        assert!(prompt.contains("- Nutrition Goals: Not specified"));
        assert!(prompt.contains("- Dietary Restrictions: None"));
        assert!(prompt.contains("- Food Allergies: None"));
        assert!(prompt.contains("- Meals per Day: 3"));
        assert!(prompt.contains("- Plan Duration: 7 days"));
        assert!(prompt.contains("- Budget: medium"));
        assert!(prompt.contains("- Cooking Time: moderate"));
    }

    #[test]
    fn test_nutrition_prompt_falls_back_to_profile_restrictions() {
        let mut context = profile();
        context.dietary_restrictions = Some("vegetarian".to_string());
        let params: GenerateNutritionRequest = serde_json::from_value(json!({})).unwrap();

        let prompt = nutrition_prompt(&context, &params);
        assert!(prompt.contains("- Dietary Restrictions: vegetarian"));
    }

    #[test]
    fn test_health_prompt_without_data() {
        let params: AnalyzeHealthRequest = serde_json::from_value(json!({})).unwrap();

        let prompt = health_analysis_prompt(&profile(), None, &[], &params);

        assert!(prompt.contains("- Resting Heart Rate: Not provided"));
        assert!(prompt.contains("- Blood Pressure: Not provided"));
        assert!(prompt.contains("Recent Workouts:\n- None"));
        assert!(prompt.contains("- Focus Areas: General health"));
        assert!(prompt.contains("- Specific Concerns: None"));
    }

    #[test]
    fn test_health_prompt_with_vitals() {
        let record = MedicalRecord {
            record_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recorded_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            resting_heart_rate: Some(58),
            blood_pressure_systolic: Some(118),
            blood_pressure_diastolic: Some(76),
            sleep_hours: Some(6.5),
            stress_level: Some(8),
            energy_level: None,
            notes: String::new(),
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        };
        let params: AnalyzeHealthRequest = serde_json::from_value(json!({
            "focus_areas": ["sleep"],
            "specific_concerns": "Waking up tired"
        }))
        .unwrap();

        let prompt = health_analysis_prompt(&profile(), Some(&record), &[], &params);

        assert!(prompt.contains("- Resting Heart Rate: 58 bpm"));
        assert!(prompt.contains("- Blood Pressure: 118/76"));
        assert!(prompt.contains("- Sleep: 6.5 hours"));
        assert!(prompt.contains("- Stress Level: 8/10"));
        assert!(prompt.contains("- Energy Level: Not provided"));
        assert!(prompt.contains("- Specific Concerns: Waking up tired"));
    }
}
