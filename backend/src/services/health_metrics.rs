//! Health metric service

use crate::error::ApiError;
use crate::repositories::{HealthMetricRepository, NewHealthMetric, UpdateHealthMetric};
use crate::services::achievements::AchievementService;
use crate::state::UserLocks;
use chrono::Utc;
use fitness_tracker_shared::models::{BloodPressure, HealthMetric};
use fitness_tracker_shared::types::{CreateHealthMetricRequest, UpdateHealthMetricRequest};
use fitness_tracker_shared::validation::{describe, validate_blood_pressure};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

fn check_blood_pressure(bp: Option<&BloodPressure>) -> Result<(), ApiError> {
    bp.map(validate_blood_pressure)
        .transpose()
        .map(|_| ())
        .map_err(ApiError::Validation)
}

pub struct HealthMetricService;

impl HealthMetricService {
    /// Store an entry and re-evaluate achievements in the same transaction
    pub async fn create(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
        req: CreateHealthMetricRequest,
    ) -> Result<HealthMetric, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        check_blood_pressure(req.blood_pressure.as_ref())?;

        let now = Utc::now();
        let input = NewHealthMetric {
            user_id,
            date: req.date.unwrap_or(now),
            steps: req.steps,
            sleep_hours: req.sleep_hours,
            water_intake_liters: req.water_intake_liters,
            weight: req.weight,
            heart_rate: req.heart_rate,
            blood_pressure: req.blood_pressure,
        };

        let _guard = locks.acquire(user_id).await;
        let mut tx = pool.begin().await?;

        let metric = HealthMetricRepository::create(&mut *tx, input)
            .await
            .map_err(ApiError::Internal)?;
        AchievementService::evaluate_in(&mut tx, user_id, now)
            .await
            .map_err(ApiError::Internal)?;

        tx.commit().await?;

        tracing::debug!(%user_id, metric_id = %metric.id, "Health metric recorded");
        Ok(metric)
    }

    /// Entries, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<HealthMetric>, ApiError> {
        HealthMetricRepository::list_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<HealthMetric, ApiError> {
        HealthMetricRepository::find_by_id(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Health metric not found".to_string()))
    }

    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateHealthMetricRequest,
    ) -> Result<HealthMetric, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        check_blood_pressure(req.blood_pressure.as_ref())?;

        let updates = UpdateHealthMetric {
            date: req.date,
            steps: req.steps,
            sleep_hours: req.sleep_hours,
            water_intake_liters: req.water_intake_liters,
            weight: req.weight,
            heart_rate: req.heart_rate,
            blood_pressure: req.blood_pressure,
        };

        HealthMetricRepository::update(pool, id, user_id, updates)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Health metric not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !HealthMetricRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Health metric not found".to_string()));
        }
        Ok(())
    }
}
