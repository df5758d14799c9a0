use super::Database;
use crate::models::{CreateMedicalRecord, MedicalRecord, UpdateMedicalRecord};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::Utc;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

impl Database {
    #[instrument(skip(self, input))]
    pub async fn create_medical_record(
        &self,
        user_id: Uuid,
        input: &CreateMedicalRecord,
    ) -> Result<MedicalRecord, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_medical_record"])
            .start_timer();

        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            INSERT INTO medical_records (record_id, user_id, recorded_date, resting_heart_rate, blood_pressure_systolic,
                                         blood_pressure_diastolic, sleep_hours, stress_level, energy_level, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING record_id, user_id, recorded_date, resting_heart_rate, blood_pressure_systolic, blood_pressure_diastolic,
                      sleep_hours, stress_level, energy_level, notes, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(input.recorded_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(input.resting_heart_rate)
        .bind(input.blood_pressure_systolic)
        .bind(input.blood_pressure_diastolic)
        .bind(input.sleep_hours)
        .bind(input.stress_level)
        .bind(input.energy_level)
        .bind(input.notes.as_deref().unwrap_or(""))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create medical record: {}", e))
        })?;

        timer.observe_duration();
        info!(record_id = %record.record_id, "Medical record created");

        Ok(record)
    }

    /// Newest first. `limit` of `None` returns every record.
    #[instrument(skip(self))]
    pub async fn list_medical_records(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MedicalRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_medical_records"])
            .start_timer();

        let records = sqlx::query_as::<_, MedicalRecord>(
            r#"
            SELECT record_id, user_id, recorded_date, resting_heart_rate, blood_pressure_systolic, blood_pressure_diastolic,
                   sleep_hours, stress_level, energy_level, notes, created_utc, updated_utc
            FROM medical_records
            WHERE user_id = $1
            ORDER BY recorded_date DESC, created_utc DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list medical records: {}", e))
        })?;

        timer.observe_duration();
        Ok(records)
    }

    pub async fn latest_medical_record(
        &self,
        user_id: Uuid,
    ) -> Result<Option<MedicalRecord>, AppError> {
        Ok(self
            .list_medical_records(user_id, Some(1))
            .await?
            .into_iter()
            .next())
    }

    #[instrument(skip(self))]
    pub async fn get_medical_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> Result<Option<MedicalRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_medical_record"])
            .start_timer();

        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            SELECT record_id, user_id, recorded_date, resting_heart_rate, blood_pressure_systolic, blood_pressure_diastolic,
                   sleep_hours, stress_level, energy_level, notes, created_utc, updated_utc
            FROM medical_records
            WHERE user_id = $1 AND record_id = $2
            "#,
        )
        .bind(user_id)
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get medical record: {}", e))
        })?;

        timer.observe_duration();
        Ok(record)
    }

    #[instrument(skip(self, input))]
    pub async fn update_medical_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        input: &UpdateMedicalRecord,
    ) -> Result<Option<MedicalRecord>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_medical_record"])
            .start_timer();

        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            UPDATE medical_records
            SET recorded_date = COALESCE($3, recorded_date),
                resting_heart_rate = COALESCE($4, resting_heart_rate),
                blood_pressure_systolic = COALESCE($5, blood_pressure_systolic),
                blood_pressure_diastolic = COALESCE($6, blood_pressure_diastolic),
                sleep_hours = COALESCE($7, sleep_hours),
                stress_level = COALESCE($8, stress_level),
                energy_level = COALESCE($9, energy_level),
                notes = COALESCE($10, notes),
                updated_utc = NOW()
            WHERE user_id = $1 AND record_id = $2
            RETURNING record_id, user_id, recorded_date, resting_heart_rate, blood_pressure_systolic, blood_pressure_diastolic,
                      sleep_hours, stress_level, energy_level, notes, created_utc, updated_utc
            "#,
        )
        .bind(user_id)
        .bind(record_id)
        .bind(input.recorded_date)
        .bind(input.resting_heart_rate)
        .bind(input.blood_pressure_systolic)
        .bind(input.blood_pressure_diastolic)
        .bind(input.sleep_hours)
        .bind(input.stress_level)
        .bind(input.energy_level)
        .bind(&input.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update medical record: {}", e))
        })?;

        timer.observe_duration();
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete_medical_record(
        &self,
        user_id: Uuid,
        record_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_medical_record"])
            .start_timer();

        let result =
            sqlx::query("DELETE FROM medical_records WHERE user_id = $1 AND record_id = $2")
                .bind(user_id)
                .bind(record_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to delete medical record: {}",
                        e
                    ))
                })?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn count_medical_records(&self, user_id: Uuid) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_medical_records"])
            .start_timer();

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM medical_records WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Failed to count medical records: {}",
                        e
                    ))
                })?;

        timer.observe_duration();
        Ok(count)
    }
}
