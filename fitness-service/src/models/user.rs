//! User account and fitness profile.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "N")]
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
            Gender::PreferNotToSay => "N",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "O" => Some(Gender::Other),
            "N" => Some(Gender::PreferNotToSay),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl FitnessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "beginner",
            FitnessLevel::Intermediate => "intermediate",
            FitnessLevel::Advanced => "advanced",
            FitnessLevel::Expert => "expert",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "intermediate" => FitnessLevel::Intermediate,
            "advanced" => FitnessLevel::Advanced,
            "expert" => FitnessLevel::Expert,
            _ => FitnessLevel::Beginner,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
            FitnessLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sedentary" => ActivityLevel::Sedentary,
            "lightly_active" => ActivityLevel::LightlyActive,
            "very_active" => ActivityLevel::VeryActive,
            "extremely_active" => ActivityLevel::ExtremelyActive,
            _ => ActivityLevel::ModeratelyActive,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtremelyActive => "Extremely Active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVisibility {
    Public,
    Private,
}

impl ProfileVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileVisibility::Public => "public",
            ProfileVisibility::Private => "private",
        }
    }
}

/// User row. Carries the password hash, so it is never serialized directly;
/// use [`User::sanitized`] for responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub fitness_level: String,
    pub activity_level: String,
    pub preferred_workout_duration: i32,
    pub available_equipment: String,
    pub fitness_goals: Json<Vec<String>>,
    pub dietary_restrictions: String,
    pub last_workout_date: Option<NaiveDate>,
    pub workout_streak: i32,
    pub longest_streak: i32,
    pub profile_visibility: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }

    pub fn bmi(&self) -> Option<f64> {
        bmi(self.height_cm, self.weight_kg)
    }

    pub fn fitness_level(&self) -> FitnessLevel {
        FitnessLevel::from_string(&self.fitness_level)
    }

    pub fn activity_level(&self) -> ActivityLevel {
        ActivityLevel::from_string(&self.activity_level)
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(Gender::from_string)
    }

    /// Equipment parsed from the comma-separated column.
    pub fn equipment_list(&self) -> Vec<String> {
        split_csv(&self.available_equipment)
    }

    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser {
            user_id: self.user_id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            date_of_birth: self.date_of_birth,
            age: self.age(),
            gender: self.gender.clone(),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bmi: self.bmi(),
            fitness_level: self.fitness_level.clone(),
            activity_level: self.activity_level.clone(),
            preferred_workout_duration: self.preferred_workout_duration,
            available_equipment: self.equipment_list(),
            fitness_goals: self.fitness_goals.0.clone(),
            dietary_restrictions: self.dietary_restrictions.clone(),
            last_workout_date: self.last_workout_date,
            workout_streak: self.workout_streak,
            longest_streak: self.longest_streak,
            profile_visibility: self.profile_visibility.clone(),
            created_utc: self.created_utc,
        }
    }
}

/// Body mass index rounded to one decimal place.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    let height_m = height_cm.filter(|h| *h > 0.0)? / 100.0;
    let weight = weight_kg.filter(|w| *w > 0.0)?;
    Some((weight / (height_m * height_m) * 10.0).round() / 10.0)
}

pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// User as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SanitizedUser {
    pub user_id: Uuid,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[schema(example = 22.9)]
    pub bmi: Option<f64>,
    pub fitness_level: String,
    pub activity_level: String,
    pub preferred_workout_duration: i32,
    pub available_equipment: Vec<String>,
    pub fitness_goals: Vec<String>,
    pub dietary_restrictions: String,
    pub last_workout_date: Option<NaiveDate>,
    pub workout_streak: i32,
    pub longest_streak: i32,
    pub profile_visibility: String,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm"))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg"))]
    pub weight_kg: Option<f64>,
    pub fitness_level: Option<FitnessLevel>,
    pub activity_level: Option<ActivityLevel>,
    #[validate(range(min = 5, max = 240, message = "Preferred duration must be 5-240 minutes"))]
    pub preferred_workout_duration: Option<i32>,
    pub available_equipment: Option<Vec<String>>,
    pub dietary_restrictions: Option<String>,
    pub profile_visibility: Option<ProfileVisibility>,
}

impl UpdateUser {
    pub fn equipment_csv(&self) -> Option<String> {
        self.available_equipment.as_ref().map(|items| {
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            user_id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            username: "jane".to_string(),
            password_hash: "$argon2id$...".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 15),
            gender: Some("F".to_string()),
            height_cm: Some(175.0),
            weight_kg: Some(70.0),
            fitness_level: "intermediate".to_string(),
            activity_level: "very_active".to_string(),
            preferred_workout_duration: 45,
            available_equipment: "dumbbells, kettlebell,,".to_string(),
            fitness_goals: Json(vec!["strength".to_string()]),
            dietary_restrictions: String::new(),
            last_workout_date: None,
            workout_streak: 0,
            longest_streak: 0,
            profile_visibility: "private".to_string(),
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        }
    }

    #[test]
    fn test_bmi_rounds_to_one_decimal() {
        assert_eq!(bmi(Some(175.0), Some(70.0)), Some(22.9));
        assert_eq!(user().bmi(), Some(22.9));
    }

    #[test]
    fn test_bmi_requires_both_measurements() {
        assert_eq!(bmi(None, Some(70.0)), None);
        assert_eq!(bmi(Some(175.0), None), None);
        assert_eq!(bmi(Some(0.0), Some(70.0)), None);
    }

    #[test]
    fn test_age_respects_birthday() {
        let u = user();
        let before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(u.age_on(before), Some(33));
        assert_eq!(u.age_on(on), Some(34));
    }

    #[test]
    fn test_age_missing_dob() {
        let mut u = user();
        u.date_of_birth = None;
        assert_eq!(u.age_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), None);
    }

    #[test]
    fn test_equipment_list_skips_blanks() {
        assert_eq!(user().equipment_list(), vec!["dumbbells", "kettlebell"]);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(Gender::from_string("F"), Some(Gender::Female));
        assert_eq!(Gender::from_string("x"), None);
        assert_eq!(FitnessLevel::from_string("expert"), FitnessLevel::Expert);
        assert_eq!(FitnessLevel::from_string("unknown"), FitnessLevel::Beginner);
        assert_eq!(
            ActivityLevel::from_string("lightly_active").display_name(),
            "Lightly Active"
        );
    }

    #[test]
    fn test_sanitized_hides_password() {
        let json = serde_json::to_value(user().sanitized()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["bmi"], 22.9);
        assert_eq!(json["available_equipment"][1], "kettlebell");
    }

    #[test]
    fn test_update_equipment_csv() {
        let update = UpdateUser {
            available_equipment: Some(vec![" bench ".to_string(), "".to_string(), "bands".to_string()]),
            ..Default::default()
        };
        assert_eq!(update.equipment_csv().as_deref(), Some("bench,bands"));
    }
}
