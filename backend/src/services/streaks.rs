//! Streak service: the user's record, explicit updates and the leaderboard

use crate::error::ApiError;
use crate::repositories::StreakRepository;
use crate::state::UserLocks;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::leaderboard::{self, LeaderboardEntry};
use fitness_tracker_shared::models::StreakState;
use fitness_tracker_shared::streak;
use sqlx::PgPool;
use uuid::Uuid;

pub struct StreakService;

impl StreakService {
    /// The user's record, created zeroed on first read
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<StreakState, ApiError> {
        StreakRepository::get_or_create(pool, user_id)
            .await
            .map_err(ApiError::Internal)
    }

    /// Apply a workout event at `now` without logging a workout
    pub async fn record_activity(
        pool: &PgPool,
        locks: &UserLocks,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StreakState, ApiError> {
        let _guard = locks.acquire(user_id).await;

        let previous = StreakRepository::find_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let (state, transition) = streak::record_workout(previous, user_id, now);

        StreakRepository::save(pool, &state)
            .await
            .map_err(ApiError::Internal)?;

        tracing::info!(%user_id, ?transition, current = state.current_streak, "Streak recorded");
        Ok(state)
    }

    /// Ranked leaderboard. `requested` is capped at `max_limit`.
    pub async fn leaderboard(
        pool: &PgPool,
        requested: Option<usize>,
        max_limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let limit = effective_limit(requested, max_limit);
        let rows = StreakRepository::leaderboard_rows(pool, limit)
            .await
            .map_err(ApiError::Internal)?;

        // Rows arrive sorted; ranking again keeps the tie-break in one place
        Ok(leaderboard::rank(rows, limit))
    }
}

fn effective_limit(requested: Option<usize>, max_limit: usize) -> usize {
    requested.unwrap_or(max_limit).clamp(1, max_limit.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 50, 50)]
    #[case(Some(10), 50, 10)]
    #[case(Some(500), 50, 50)]
    #[case(Some(0), 50, 1)]
    #[case(None, 0, 1)]
    fn test_effective_limit(
        #[case] requested: Option<usize>,
        #[case] max: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(effective_limit(requested, max), expected);
    }
}
