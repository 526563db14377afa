//! Goal service
//!
//! CRUD plus the on-demand progress recompute. A goal that completes here
//! gets an achievement pass in the same transaction, so goal achievements
//! unlock right away or not at all.

use crate::error::ApiError;
use crate::repositories::{
    GoalRepository, HealthMetricRepository, NewGoal, UpdateGoal, WorkoutRepository,
};
use crate::services::achievements::AchievementService;
use crate::state::UserLocks;
use chrono::Utc;
use fitness_tracker_shared::goal_progress::{self, GoalEvidence};
use fitness_tracker_shared::models::{Goal, GoalStatus};
use fitness_tracker_shared::types::{
    CreateGoalRequest, GoalProgressRequest, GoalsListQuery, UpdateGoalRequest,
};
use fitness_tracker_shared::validation::{
    describe, required_text, validate_goal_dates, validate_goal_update, validate_new_goal,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct GoalService;

impl GoalService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateGoalRequest,
    ) -> Result<Goal, ApiError> {
        let now = Utc::now();
        validate_new_goal(&req, now).map_err(ApiError::Validation)?;

        let input = NewGoal {
            user_id,
            title: required_text("Title", &req.title).map_err(ApiError::Validation)?,
            description: req.description,
            goal_type: req.goal_type,
            target_value: req.target_value,
            current_value: req.current_value,
            unit: required_text("Unit", &req.unit).map_err(ApiError::Validation)?,
            start_date: req.start_date.unwrap_or(now),
            target_date: req.target_date,
            priority: req.priority.unwrap_or_default(),
        };

        let goal = GoalRepository::create(pool, input)
            .await
            .map_err(ApiError::Internal)?;

        info!(%user_id, goal_id = %goal.id, goal_type = %goal.goal_type, "Goal created");
        Ok(goal)
    }

    /// Newest first, optionally filtered
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: &GoalsListQuery,
    ) -> Result<Vec<Goal>, ApiError> {
        GoalRepository::list_by_user(pool, user_id, query.status, query.goal_type)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Goal, ApiError> {
        GoalRepository::find_by_id(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))
    }

    pub async fn update(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
        id: Uuid,
        req: UpdateGoalRequest,
    ) -> Result<Goal, ApiError> {
        validate_goal_update(&req).map_err(ApiError::Validation)?;

        let _guard = locks.acquire(user_id).await;
        let existing = Self::get(pool, user_id, id).await?;
        if let Some(target_date) = req.target_date {
            validate_goal_dates(existing.start_date, target_date).map_err(ApiError::Validation)?;
        }

        let now = Utc::now();
        let updates = UpdateGoal {
            title: req.title,
            description: req.description,
            target_value: req.target_value,
            unit: req.unit,
            target_date: req.target_date,
            status: req.status,
            priority: req.priority,
            completed_at: existing.completed_at_after(req.status, now),
        };
        let completing =
            existing.status != GoalStatus::Completed && req.status == Some(GoalStatus::Completed);

        let mut tx = pool.begin().await?;
        let updated = GoalRepository::update(&mut tx, id, user_id, updates)
            .await
            .map_err(ApiError::Internal)?;
        if !updated {
            return Err(ApiError::NotFound("Goal not found".to_string()));
        }
        if completing {
            AchievementService::evaluate_in(&mut tx, user_id, now)
                .await
                .map_err(ApiError::Internal)?;
        }
        tx.commit().await?;

        if completing {
            metrics::counter!("goals_completed_total").increment(1);
            info!(%user_id, goal_id = %id, "Goal marked completed");
        }
        Self::get(pool, user_id, id).await
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = GoalRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Goal not found".to_string()));
        }
        Ok(())
    }

    /// Recompute one goal from the user's records and persist the result
    pub async fn update_progress(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
        id: Uuid,
        req: GoalProgressRequest,
    ) -> Result<Goal, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        if req.current_value.is_some_and(|v| !v.is_finite()) {
            return Err(ApiError::Validation("Current value must be a valid number".to_string()));
        }

        let _guard = locks.acquire(user_id).await;
        let mut goal = Self::get(pool, user_id, id).await?;

        let workouts = WorkoutRepository::all_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let health_metrics = HealthMetricRepository::list_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let now = Utc::now();
        let evidence = GoalEvidence {
            workouts: &workouts,
            metrics: &health_metrics,
            custom_value: req.current_value,
        };
        let update = goal_progress::recompute(&mut goal, evidence, now);

        let completed = update.status_change == Some(GoalStatus::Completed);

        let mut tx = pool.begin().await?;
        GoalRepository::save_progress(&mut tx, &goal)
            .await
            .map_err(ApiError::Internal)?;
        if completed {
            AchievementService::evaluate_in(&mut tx, user_id, now)
                .await
                .map_err(ApiError::Internal)?;
        }
        tx.commit().await?;

        tracing::debug!(
            %user_id,
            goal_id = %goal.id,
            previous = update.previous_value,
            current = goal.current_value,
            milestones = ?update.milestones_reached,
            "Goal progress recomputed"
        );

        match update.status_change {
            Some(GoalStatus::Completed) => {
                metrics::counter!("goals_completed_total").increment(1);
                info!(%user_id, goal_id = %goal.id, "Goal completed");
            }
            Some(GoalStatus::Failed) => {
                metrics::counter!("goals_failed_total").increment(1);
                info!(%user_id, goal_id = %goal.id, "Goal failed: deadline passed");
            }
            _ => {}
        }

        Ok(goal)
    }
}
