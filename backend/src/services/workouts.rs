//! Workout service
//!
//! Logging a workout is the main progress event: the record, the streak
//! update and the achievement pass commit together under the user's lock.

use crate::error::ApiError;
use crate::repositories::{NewWorkout, StreakRepository, UpdateWorkout, WorkoutRepository};
use crate::services::achievements::AchievementService;
use crate::state::UserLocks;
use chrono::Utc;
use fitness_tracker_shared::aggregates::WorkoutAggregates;
use fitness_tracker_shared::models::Workout;
use fitness_tracker_shared::streak;
use fitness_tracker_shared::types::{
    CreateWorkoutRequest, LogWorkoutResponse, UpdateWorkoutRequest, WorkoutListQuery,
    WorkoutStatsResponse,
};
use fitness_tracker_shared::validation::{describe, required_text, validate_workout};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct WorkoutService;

impl WorkoutService {
    /// Store a workout, advance the streak and evaluate achievements
    pub async fn log(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
        req: CreateWorkoutRequest,
    ) -> Result<LogWorkoutResponse, ApiError> {
        validate_workout(&req).map_err(ApiError::Validation)?;
        let exercise_name =
            required_text("Exercise name", &req.exercise_name).map_err(ApiError::Validation)?;

        let now = Utc::now();
        let input = NewWorkout {
            user_id,
            exercise_name,
            category: req.category.unwrap_or_default(),
            duration_minutes: req.duration_minutes,
            calories_burned: req.calories_burned,
            intensity: req.intensity.unwrap_or_default(),
            notes: req.notes,
            date: req.date.unwrap_or(now),
        };

        let _guard = locks.acquire(user_id).await;
        let mut tx = pool.begin().await?;

        let workout = WorkoutRepository::create(&mut *tx, input)
            .await
            .map_err(ApiError::Internal)?;

        let previous = StreakRepository::find_by_user(&mut *tx, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let (state, _) = streak::record_workout(previous, user_id, now);
        StreakRepository::save(&mut *tx, &state)
            .await
            .map_err(ApiError::Internal)?;

        let outcome = AchievementService::evaluate_in(&mut tx, user_id, now)
            .await
            .map_err(ApiError::Internal)?;

        tx.commit().await?;

        metrics::counter!("workouts_logged_total").increment(1);
        tracing::info!(
            %user_id,
            workout_id = %workout.id,
            streak = state.current_streak,
            unlocked = outcome.evaluation.newly_unlocked.len(),
            "Workout logged"
        );

        Ok(LogWorkoutResponse {
            workout,
            streak: outcome.streak.unwrap_or(state),
            newly_unlocked: outcome.evaluation.newly_unlocked,
        })
    }

    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: &WorkoutListQuery,
    ) -> Result<Vec<Workout>, ApiError> {
        WorkoutRepository::list_by_user(pool, user_id, query)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Workout, ApiError> {
        WorkoutRepository::find_by_id(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))
    }

    /// Edit a workout. Streak and achievements are left as they are.
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        req: UpdateWorkoutRequest,
    ) -> Result<Workout, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        let exercise_name = req
            .exercise_name
            .as_deref()
            .map(|name| required_text("Exercise name", name))
            .transpose()
            .map_err(ApiError::Validation)?;

        let updates = UpdateWorkout {
            exercise_name,
            category: req.category,
            duration_minutes: req.duration_minutes,
            calories_burned: req.calories_burned,
            intensity: req.intensity,
            notes: req.notes,
            date: req.date,
        };

        WorkoutRepository::update(pool, id, user_id, updates)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = WorkoutRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Workout not found".to_string()));
        }
        Ok(())
    }

    /// Lifetime totals and the per-category breakdown
    pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<WorkoutStatsResponse, ApiError> {
        let workouts = WorkoutRepository::all_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(WorkoutAggregates::from_workouts(&workouts).into())
    }
}
