//! Achievement service
//!
//! Loads everything the achievement engine reads, runs it and writes back
//! the refreshed rows and the credited points.

use crate::error::ApiError;
use crate::repositories::{
    AchievementRepository, GoalRepository, StreakRepository, UserAchievementRepository,
    WorkoutRepository,
};
use crate::state::UserLocks;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::achievements::{self, AchievementInputs, Evaluation};
use fitness_tracker_shared::aggregates::WorkoutAggregates;
use fitness_tracker_shared::models::{Achievement, StreakState};
use fitness_tracker_shared::types::{AchievementCheckResponse, UserAchievementResponse};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Outcome of an evaluation pass, with the streak record as saved
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub evaluation: Evaluation,
    pub streak: Option<StreakState>,
}

pub struct AchievementService;

impl AchievementService {
    /// The catalog in display order
    pub async fn catalog(pool: &PgPool) -> Result<Vec<Achievement>, ApiError> {
        AchievementRepository::list(pool)
            .await
            .map_err(ApiError::Internal)
    }

    /// The user's rows, unlocked first (latest unlock first)
    pub async fn user_achievements(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<UserAchievementResponse>, ApiError> {
        let rows = UserAchievementRepository::list_with_catalog(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(rows
            .into_iter()
            .map(|(achievement, row)| UserAchievementResponse::new(achievement, row))
            .collect())
    }

    /// Explicit re-evaluation for one user
    pub async fn check(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
    ) -> Result<AchievementCheckResponse, ApiError> {
        let _guard = locks.acquire(user_id).await;

        let mut tx = pool.begin().await?;
        let outcome = Self::evaluate_in(&mut tx, user_id, Utc::now())
            .await
            .map_err(ApiError::Internal)?;
        tx.commit().await?;

        Ok(AchievementCheckResponse {
            newly_unlocked: outcome.evaluation.newly_unlocked,
            total_points: outcome.evaluation.total_points,
        })
    }

    /// Evaluate the catalog for `user_id` on an open connection.
    ///
    /// The caller holds the user's lock and owns the transaction. The streak
    /// record is read but never created here: without one, unlocks still
    /// happen and their points are skipped.
    pub async fn evaluate_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> anyhow::Result<EvaluationOutcome> {
        let catalog = AchievementRepository::list(&mut *conn).await?;
        let existing = UserAchievementRepository::list_by_user(&mut *conn, user_id).await?;
        let workouts = WorkoutRepository::all_for_user(&mut *conn, user_id).await?;
        let completed_goals = GoalRepository::count_completed(&mut *conn, user_id).await?;
        let mut streak = StreakRepository::find_by_user(&mut *conn, user_id).await?;

        let inputs = AchievementInputs {
            aggregates: WorkoutAggregates::from_workouts(&workouts),
            current_streak: streak.as_ref().map_or(0, |s| s.current_streak),
            completed_goals,
        };

        let evaluation =
            achievements::evaluate(user_id, &catalog, &existing, &inputs, &mut streak, now);

        for row in &evaluation.progress {
            UserAchievementRepository::upsert(&mut *conn, row).await?;
        }

        if evaluation.points_awarded > 0 {
            if let Some(state) = &streak {
                StreakRepository::save(&mut *conn, state).await?;
            }
        }

        if !evaluation.newly_unlocked.is_empty() {
            metrics::counter!("achievements_unlocked_total")
                .increment(evaluation.newly_unlocked.len() as u64);
        }

        tracing::debug!(
            %user_id,
            evaluated = catalog.len(),
            unlocked = evaluation.newly_unlocked.len(),
            points_awarded = evaluation.points_awarded,
            "Achievements evaluated"
        );

        Ok(EvaluationOutcome { evaluation, streak })
    }
}
