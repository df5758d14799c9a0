//! Per-user, per-day usage rollup of generation calls.

use crate::models::ContentType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Exactly one row exists per (user, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UsageStat {
    pub stat_id: Uuid,
    pub user_id: Uuid,
    pub stat_date: NaiveDate,
    pub total_requests: i64,
    pub successful_requests: i64,
    pub failed_requests: i64,
    pub workout_requests: i64,
    pub nutrition_requests: i64,
    pub health_analysis_requests: i64,
    pub total_tokens_used: i64,
    pub avg_response_time: Option<f64>,
    pub avg_user_rating: Option<f64>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Outcome of one generation call, as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageEvent {
    pub category: ContentType,
    pub succeeded: bool,
    pub tokens: i64,
    pub elapsed_seconds: f64,
}

impl UsageStat {
    /// Fresh row with all counters at zero.
    pub fn empty(user_id: Uuid, stat_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            stat_id: Uuid::new_v4(),
            user_id,
            stat_date,
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            workout_requests: 0,
            nutrition_requests: 0,
            health_analysis_requests: 0,
            total_tokens_used: 0,
            avg_response_time: None,
            avg_user_rating: None,
            created_utc: now,
            updated_utc: now,
        }
    }

    /// Fold one generation outcome into the row.
    ///
    /// Only workout, nutrition and health analysis have their own counter;
    /// other categories still count towards the totals.
    pub fn apply(&mut self, event: &UsageEvent) {
        self.total_requests += 1;
        if event.succeeded {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
        self.total_tokens_used += event.tokens;

        match event.category {
            ContentType::Workout => self.workout_requests += 1,
            ContentType::Nutrition => self.nutrition_requests += 1,
            ContentType::HealthAnalysis => self.health_analysis_requests += 1,
            ContentType::ExerciseInstructions | ContentType::Motivation => {}
        }

        self.avg_response_time = Some(round2(smoothed_average(
            self.avg_response_time,
            event.elapsed_seconds,
        )));
    }

    /// Fold a user rating (1-5) into the rating average.
    pub fn apply_rating(&mut self, rating: i32) {
        self.avg_user_rating = Some(round2(smoothed_average(
            self.avg_user_rating,
            f64::from(rating),
        )));
    }
}

/// `(existing + sample) / 2`, or `sample` when there is no prior value.
///
/// A stored zero counts as "no prior value". This weights the newest sample
/// at one half regardless of how many samples came before; it is not an
/// arithmetic mean. See DESIGN.md.
pub fn smoothed_average(existing: Option<f64>, sample: f64) -> f64 {
    match existing {
        Some(avg) if avg != 0.0 => (avg + sample) / 2.0,
        _ => sample,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Request count for one (content type, status) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RequestBreakdown {
    pub content_type: String,
    pub status: String,
    pub count: i64,
}

/// Usage over a trailing window of days.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageSummary {
    pub period_days: i64,
    pub total_requests: i64,
    pub successful_requests: i64,
    pub failed_requests: i64,
    pub total_tokens_used: i64,
    pub average_rating: Option<f64>,
    pub requests_breakdown: Vec<RequestBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(category: ContentType, succeeded: bool, elapsed_seconds: f64) -> UsageEvent {
        UsageEvent {
            category,
            succeeded,
            tokens: 100,
            elapsed_seconds,
        }
    }

    fn record_all(events: &[UsageEvent]) -> UsageStat {
        let mut stat = UsageStat::empty(Uuid::new_v4(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        for e in events {
            stat.apply(e);
        }
        stat
    }

    #[test]
    fn test_single_call_average_is_its_elapsed_time() {
        let stat = record_all(&[event(ContentType::Workout, true, 10.0)]);
        assert_eq!(stat.avg_response_time, Some(10.0));
    }

    #[test]
    fn test_two_calls_average() {
        let stat = record_all(&[
            event(ContentType::Workout, true, 10.0),
            event(ContentType::Workout, true, 20.0),
        ]);
        assert_eq!(stat.avg_response_time, Some(15.0));
    }

    #[test]
    fn test_three_calls_use_smoothing_not_mean() {
        let stat = record_all(&[
            event(ContentType::Workout, true, 10.0),
            event(ContentType::Workout, true, 20.0),
            event(ContentType::Workout, true, 5.0),
        ]);
        // Arithmetic mean would be 11.67
        assert_eq!(stat.avg_response_time, Some(10.0));
    }

    #[test]
    fn test_zero_average_is_treated_as_absent() {
        assert_eq!(smoothed_average(Some(0.0), 8.0), 8.0);
        assert_eq!(smoothed_average(None, 8.0), 8.0);
        assert_eq!(smoothed_average(Some(4.0), 8.0), 6.0);
    }

    #[test]
    fn test_total_counts_every_call() {
        let events: Vec<_> = (0..7)
            .map(|i| event(ContentType::Nutrition, i % 3 != 0, 1.0))
            .collect();
        let stat = record_all(&events);

        assert_eq!(stat.total_requests, 7);
        assert_eq!(stat.successful_requests + stat.failed_requests, stat.total_requests);
        assert_eq!(stat.failed_requests, 3);
        assert_eq!(stat.total_tokens_used, 700);
    }

    #[test]
    fn test_category_counters() {
        let stat = record_all(&[
            event(ContentType::Workout, true, 1.0),
            event(ContentType::Nutrition, false, 1.0),
            event(ContentType::HealthAnalysis, true, 1.0),
            event(ContentType::HealthAnalysis, true, 1.0),
        ]);
        assert_eq!(stat.workout_requests, 1);
        assert_eq!(stat.nutrition_requests, 1);
        assert_eq!(stat.health_analysis_requests, 2);
    }

    #[test]
    fn test_unmatched_category_only_moves_totals() {
        let stat = record_all(&[event(ContentType::Motivation, true, 3.0)]);

        assert_eq!(stat.total_requests, 1);
        assert_eq!(stat.successful_requests, 1);
        assert_eq!(stat.workout_requests, 0);
        assert_eq!(stat.nutrition_requests, 0);
        assert_eq!(stat.health_analysis_requests, 0);
    }

    #[test]
    fn test_rating_average() {
        let mut stat = UsageStat::empty(Uuid::new_v4(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        stat.apply_rating(4);
        assert_eq!(stat.avg_user_rating, Some(4.0));
        stat.apply_rating(5);
        assert_eq!(stat.avg_user_rating, Some(4.5));
        stat.apply_rating(2);
        assert_eq!(stat.avg_user_rating, Some(3.25));
    }
}
