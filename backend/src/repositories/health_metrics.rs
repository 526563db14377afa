//! Health metric repository

use super::{to_decimal_opt, to_f64};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::models::{BloodPressure, HealthMetric};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Health metric record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthMetricRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub steps: i64,
    pub sleep_hours: Option<Decimal>,
    pub water_intake_liters: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub heart_rate: Option<i32>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
}

impl From<HealthMetricRecord> for HealthMetric {
    fn from(record: HealthMetricRecord) -> Self {
        let blood_pressure = match (record.systolic, record.diastolic) {
            (Some(systolic), Some(diastolic)) => Some(BloodPressure { systolic, diastolic }),
            _ => None,
        };

        HealthMetric {
            id: record.id,
            user_id: record.user_id,
            date: record.date,
            steps: record.steps,
            sleep_hours: record.sleep_hours.map(to_f64),
            water_intake_liters: record.water_intake_liters.map(to_f64),
            weight: record.weight.map(to_f64),
            heart_rate: record.heart_rate,
            blood_pressure,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewHealthMetric {
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub steps: i64,
    pub sleep_hours: Option<f64>,
    pub water_intake_liters: Option<f64>,
    pub weight: Option<f64>,
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateHealthMetric {
    pub date: Option<DateTime<Utc>>,
    pub steps: Option<i64>,
    pub sleep_hours: Option<f64>,
    pub water_intake_liters: Option<f64>,
    pub weight: Option<f64>,
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
}

const METRIC_COLUMNS: &str = "id, user_id, date, steps, sleep_hours, water_intake_liters, \
                              weight, heart_rate, systolic, diastolic";

pub struct HealthMetricRepository;

impl HealthMetricRepository {
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        input: NewHealthMetric,
    ) -> Result<HealthMetric> {
        let record = sqlx::query_as::<_, HealthMetricRecord>(&format!(
            r#"
            INSERT INTO health_metrics (
                user_id, date, steps, sleep_hours, water_intake_liters,
                weight, heart_rate, systolic, diastolic
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {METRIC_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(input.date)
        .bind(input.steps)
        .bind(to_decimal_opt(input.sleep_hours)?)
        .bind(to_decimal_opt(input.water_intake_liters)?)
        .bind(to_decimal_opt(input.weight)?)
        .bind(input.heart_rate)
        .bind(input.blood_pressure.map(|bp| bp.systolic))
        .bind(input.blood_pressure.map(|bp| bp.diastolic))
        .fetch_one(executor)
        .await?;

        Ok(record.into())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<HealthMetric>> {
        let record = sqlx::query_as::<_, HealthMetricRecord>(&format!(
            "SELECT {METRIC_COLUMNS} FROM health_metrics WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record.map(HealthMetric::from))
    }

    /// A user's metrics, newest first
    pub async fn list_by_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<HealthMetric>> {
        let records = sqlx::query_as::<_, HealthMetricRecord>(&format!(
            "SELECT {METRIC_COLUMNS} FROM health_metrics WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(records.into_iter().map(HealthMetric::from).collect())
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateHealthMetric,
    ) -> Result<Option<HealthMetric>> {
        let record = sqlx::query_as::<_, HealthMetricRecord>(&format!(
            r#"
            UPDATE health_metrics SET
                date = COALESCE($3, date),
                steps = COALESCE($4, steps),
                sleep_hours = COALESCE($5, sleep_hours),
                water_intake_liters = COALESCE($6, water_intake_liters),
                weight = COALESCE($7, weight),
                heart_rate = COALESCE($8, heart_rate),
                systolic = COALESCE($9, systolic),
                diastolic = COALESCE($10, diastolic),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {METRIC_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(updates.date)
        .bind(updates.steps)
        .bind(to_decimal_opt(updates.sleep_hours)?)
        .bind(to_decimal_opt(updates.water_intake_liters)?)
        .bind(to_decimal_opt(updates.weight)?)
        .bind(updates.heart_rate)
        .bind(updates.blood_pressure.map(|bp| bp.systolic))
        .bind(updates.blood_pressure.map(|bp| bp.diastolic))
        .fetch_optional(pool)
        .await?;

        Ok(record.map(HealthMetric::from))
    }

    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM health_metrics WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
