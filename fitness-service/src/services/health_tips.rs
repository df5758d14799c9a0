//! Rule-based health tips from the latest vitals and BMI.

use crate::dtos::users::HealthTip;
use crate::models::MedicalRecord;

const HIGH_STRESS: i32 = 7;
const MIN_SLEEP_HOURS: f64 = 7.0;
const LOW_ENERGY: i32 = 5;
const UNDERWEIGHT_BMI: f64 = 18.5;
const OVERWEIGHT_BMI: f64 = 25.0;

pub fn health_tips(latest: Option<&MedicalRecord>, bmi: Option<f64>) -> Vec<HealthTip> {
    let mut tips = Vec::new();

    if let Some(record) = latest {
        if record.stress_level.is_some_and(|s| s > HIGH_STRESS) {
            tips.push(tip(
                "stress",
                "high",
                "High Stress Levels",
                "Your stress levels are high. Consider meditation or yoga.",
            ));
        }
        if record.sleep_hours.is_some_and(|h| h < MIN_SLEEP_HOURS) {
            tips.push(tip(
                "sleep",
                "medium",
                "Sleep Improvement",
                "You may need more sleep for optimal recovery.",
            ));
        }
        if record.energy_level.is_some_and(|e| e < LOW_ENERGY) {
            tips.push(tip(
                "energy",
                "medium",
                "Low Energy",
                "Low energy levels detected. Consider adjusting your nutrition.",
            ));
        }
    }

    match bmi {
        Some(b) if b < UNDERWEIGHT_BMI => tips.push(tip(
            "weight",
            "medium",
            "Weight Management",
            "Your BMI indicates you may be underweight.",
        )),
        Some(b) if b > OVERWEIGHT_BMI => tips.push(tip(
            "weight",
            "medium",
            "Weight Management",
            "Your BMI indicates you may be overweight.",
        )),
        _ => {}
    }

    tips
}

fn tip(tip_type: &str, priority: &str, title: &str, message: &str) -> HealthTip {
    HealthTip {
        tip_type: tip_type.to_string(),
        priority: priority.to_string(),
        title: title.to_string(),
        message: message.to_string(),
    }
}
