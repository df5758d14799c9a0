//! Per-user, per-day usage accounting for generation calls.

use crate::models::{ContentType, UsageEvent, UsageStat, UsageSummary};
use crate::services::database::Database;
use chrono::{Duration, NaiveDate, Utc};
use service_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct UsageAggregator {
    db: Database,
}

impl UsageAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Count one generation call against today's row. Not idempotent.
    #[instrument(skip(self), fields(category = category.as_str()))]
    pub async fn record(
        &self,
        user_id: Uuid,
        category: ContentType,
        succeeded: bool,
        tokens: i64,
        elapsed_seconds: f64,
    ) -> Result<UsageStat, AppError> {
        let event = UsageEvent {
            category,
            succeeded,
            tokens,
            elapsed_seconds,
        };
        self.db
            .record_usage(user_id, Utc::now().date_naive(), &event)
            .await
    }

    /// Fold a rating into the row for the day the rated request was made.
    pub async fn record_rating(
        &self,
        user_id: Uuid,
        request_date: NaiveDate,
        rating: i32,
    ) -> Result<bool, AppError> {
        self.db
            .record_usage_rating(user_id, request_date, rating)
            .await
    }

    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: Uuid, days: i64) -> Result<UsageSummary, AppError> {
        let since = window_start(days);
        let totals = self.db.usage_totals(user_id, since.date_naive()).await?;
        let breakdown = self.db.request_breakdown(user_id, since).await?;

        Ok(UsageSummary {
            period_days: days,
            total_requests: totals.total_requests,
            successful_requests: totals.successful_requests,
            failed_requests: totals.failed_requests,
            total_tokens_used: totals.total_tokens_used,
            average_rating: totals.average_rating.map(|r| (r * 100.0).round() / 100.0),
            requests_breakdown: breakdown,
        })
    }

    /// Daily rows in the window, newest first.
    pub async fn daily(&self, user_id: Uuid, days: i64) -> Result<Vec<UsageStat>, AppError> {
        self.db
            .list_usage_stats(user_id, window_start(days).date_naive())
            .await
    }
}

fn window_start(days: i64) -> chrono::DateTime<Utc> {
    Utc::now() - Duration::days(days)
}
