//! Health vitals recorded by the user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MedicalRecord {
    pub record_id: Uuid,
    pub user_id: Uuid,
    pub recorded_date: NaiveDate,
    pub resting_heart_rate: Option<i32>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<i32>,
    pub energy_level: Option<i32>,
    pub notes: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl MedicalRecord {
    /// Vitals as a flat JSON object, omitting unset readings.
    pub fn vitals(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(
            "recorded_date".to_string(),
            serde_json::Value::String(self.recorded_date.to_string()),
        );
        if let Some(v) = self.resting_heart_rate {
            map.insert("resting_heart_rate".to_string(), v.into());
        }
        if let (Some(sys), Some(dia)) = (self.blood_pressure_systolic, self.blood_pressure_diastolic) {
            map.insert(
                "blood_pressure".to_string(),
                serde_json::Value::String(format!("{}/{}", sys, dia)),
            );
        }
        if let Some(v) = self.sleep_hours {
            map.insert("sleep_hours".to_string(), v.into());
        }
        if let Some(v) = self.stress_level {
            map.insert("stress_level".to_string(), v.into());
        }
        if let Some(v) = self.energy_level {
            map.insert("energy_level".to_string(), v.into());
        }
        serde_json::Value::Object(map)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateMedicalRecord {
    pub recorded_date: Option<NaiveDate>,
    #[validate(range(min = 40, max = 120, message = "Resting heart rate must be 40-120 bpm"))]
    pub resting_heart_rate: Option<i32>,
    #[validate(range(min = 80, max = 200, message = "Systolic pressure must be 80-200"))]
    pub blood_pressure_systolic: Option<i32>,
    #[validate(range(min = 50, max = 120, message = "Diastolic pressure must be 50-120"))]
    pub blood_pressure_diastolic: Option<i32>,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be 0-24"))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 1, max = 10, message = "Stress level must be 1-10"))]
    pub stress_level: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "Energy level must be 1-10"))]
    pub energy_level: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Same shape as the create body; absent fields stay unchanged.
pub type UpdateMedicalRecord = CreateMedicalRecord;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vitals_omit_missing_values() {
        let record = MedicalRecord {
            record_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recorded_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            resting_heart_rate: Some(62),
            blood_pressure_systolic: Some(120),
            blood_pressure_diastolic: Some(80),
            sleep_hours: None,
            stress_level: Some(4),
            energy_level: None,
            notes: String::new(),
            created_utc: Utc::now(),
            updated_utc: Utc::now(),
        };

        let vitals = record.vitals();
        assert_eq!(vitals["blood_pressure"], "120/80");
        assert_eq!(vitals["resting_heart_rate"], 62);
        assert!(vitals.get("sleep_hours").is_none());
        assert!(vitals.get("energy_level").is_none());
    }

    #[test]
    fn test_create_validation_ranges() {
        let ok = CreateMedicalRecord {
            resting_heart_rate: Some(60),
            stress_level: Some(10),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = CreateMedicalRecord {
            resting_heart_rate: Some(30),
            sleep_hours: Some(25.0),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("resting_heart_rate"));
        assert!(fields.contains_key("sleep_hours"));
    }
}
