use super::Database;
use crate::models::{RequestBreakdown, UsageEvent, UsageStat};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::{DateTime, NaiveDate, Utc};
use service_core::error::AppError;
use sqlx::FromRow;
use tracing::{debug, instrument};
use uuid::Uuid;

const USAGE_COLUMNS: &str = "stat_id, user_id, stat_date, total_requests, successful_requests, \
    failed_requests, workout_requests, nutrition_requests, health_analysis_requests, \
    total_tokens_used, avg_response_time, avg_user_rating, created_utc, updated_utc";

/// Sums over a user's daily usage rows.
#[derive(Debug, Clone, FromRow)]
pub struct UsageTotals {
    pub total_requests: i64,
    pub successful_requests: i64,
    pub failed_requests: i64,
    pub total_tokens_used: i64,
    pub average_rating: Option<f64>,
}

impl Database {
    /// Fold one generation outcome into the (user, date) usage row.
    ///
    /// The row is created if missing, then locked with `FOR UPDATE` and
    /// rewritten inside a single transaction, so concurrent calls for the same
    /// user and day serialise on the row lock.
    #[instrument(skip(self, event), fields(category = event.category.as_str(), succeeded = event.succeeded))]
    pub async fn record_usage(
        &self,
        user_id: Uuid,
        stat_date: NaiveDate,
        event: &UsageEvent,
    ) -> Result<UsageStat, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_usage"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO usage_stats (stat_id, user_id, stat_date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, stat_date) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(stat_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create usage row: {}", e)))?;

        let sql = format!(
            "SELECT {USAGE_COLUMNS} FROM usage_stats WHERE user_id = $1 AND stat_date = $2 FOR UPDATE"
        );
        let mut stat = sqlx::query_as::<_, UsageStat>(&sql)
            .bind(user_id)
            .bind(stat_date)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock usage row: {}", e)))?;

        stat.apply(event);

        let sql = format!(
            r#"
            UPDATE usage_stats
            SET total_requests = $2,
                successful_requests = $3,
                failed_requests = $4,
                workout_requests = $5,
                nutrition_requests = $6,
                health_analysis_requests = $7,
                total_tokens_used = $8,
                avg_response_time = $9,
                updated_utc = NOW()
            WHERE stat_id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        );
        let stat = sqlx::query_as::<_, UsageStat>(&sql)
            .bind(stat.stat_id)
            .bind(stat.total_requests)
            .bind(stat.successful_requests)
            .bind(stat.failed_requests)
            .bind(stat.workout_requests)
            .bind(stat.nutrition_requests)
            .bind(stat.health_analysis_requests)
            .bind(stat.total_tokens_used)
            .bind(stat.avg_response_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update usage row: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        debug!(total_requests = stat.total_requests, "Usage recorded");

        Ok(stat)
    }

    /// Fold a user rating into the usage row for `stat_date`.
    ///
    /// Does nothing when no row exists for that day. Returns whether a row was updated.
    #[instrument(skip(self))]
    pub async fn record_usage_rating(
        &self,
        user_id: Uuid,
        stat_date: NaiveDate,
        rating: i32,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_usage_rating"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let sql = format!(
            "SELECT {USAGE_COLUMNS} FROM usage_stats WHERE user_id = $1 AND stat_date = $2 FOR UPDATE"
        );
        let stat = sqlx::query_as::<_, UsageStat>(&sql)
            .bind(user_id)
            .bind(stat_date)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock usage row: {}", e)))?;

        let Some(mut stat) = stat else {
            tx.rollback().await.ok();
            timer.observe_duration();
            return Ok(false);
        };

        stat.apply_rating(rating);

        sqlx::query("UPDATE usage_stats SET avg_user_rating = $2, updated_utc = NOW() WHERE stat_id = $1")
            .bind(stat.stat_id)
            .bind(stat.avg_user_rating)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to update usage rating: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        Ok(true)
    }

    /// Daily rows on or after `since`, newest first.
    #[instrument(skip(self))]
    pub async fn list_usage_stats(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<UsageStat>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_usage_stats"])
            .start_timer();

        let sql = format!(
            r#"
            SELECT {USAGE_COLUMNS}
            FROM usage_stats
            WHERE user_id = $1 AND stat_date >= $2
            ORDER BY stat_date DESC
            "#
        );
        let stats = sqlx::query_as::<_, UsageStat>(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list usage stats: {}", e)))?;

        timer.observe_duration();
        Ok(stats)
    }

    #[instrument(skip(self))]
    pub async fn usage_totals(&self, user_id: Uuid, since: NaiveDate) -> Result<UsageTotals, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["usage_totals"])
            .start_timer();

        let totals = sqlx::query_as::<_, UsageTotals>(
            r#"
            SELECT
                COALESCE(SUM(total_requests), 0)::BIGINT AS total_requests,
                COALESCE(SUM(successful_requests), 0)::BIGINT AS successful_requests,
                COALESCE(SUM(failed_requests), 0)::BIGINT AS failed_requests,
                COALESCE(SUM(total_tokens_used), 0)::BIGINT AS total_tokens_used,
                AVG(avg_user_rating)::DOUBLE PRECISION AS average_rating
            FROM usage_stats
            WHERE user_id = $1 AND stat_date >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum usage stats: {}", e)))?;

        timer.observe_duration();
        Ok(totals)
    }

    /// Count of content requests created at or after `since`, by type and status.
    #[instrument(skip(self))]
    pub async fn request_breakdown(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<RequestBreakdown>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["request_breakdown"])
            .start_timer();

        let rows = sqlx::query_as::<_, RequestBreakdown>(
            r#"
            SELECT content_type, status, COUNT(*) AS count
            FROM content_requests
            WHERE user_id = $1 AND created_utc >= $2
            GROUP BY content_type, status
            ORDER BY content_type, status
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to break down requests: {}", e))
        })?;

        timer.observe_duration();
        Ok(rows)
    }
}
