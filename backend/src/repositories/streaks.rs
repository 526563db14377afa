//! Streak repository: one streak record per user, plus the leaderboard read

use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::leaderboard::LeaderboardRow;
use fitness_tracker_shared::models::StreakState;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StreakRecord {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_workout_date: Option<DateTime<Utc>>,
    pub streak_start_date: Option<DateTime<Utc>>,
    pub total_points: i64,
    pub level: i32,
}

impl From<StreakRecord> for StreakState {
    fn from(record: StreakRecord) -> Self {
        StreakState {
            user_id: record.user_id,
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            last_workout_date: record.last_workout_date,
            streak_start_date: record.streak_start_date,
            total_points: record.total_points,
            level: record.level,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct LeaderboardRecord {
    user_id: Uuid,
    name: String,
    total_points: i64,
    level: i32,
    current_streak: i32,
    longest_streak: i32,
}

const STREAK_COLUMNS: &str = "user_id, current_streak, longest_streak, last_workout_date, \
                              streak_start_date, total_points, level";

pub struct StreakRepository;

impl StreakRepository {
    /// The user's record, without creating one
    pub async fn find_by_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Option<StreakState>> {
        let record = sqlx::query_as::<_, StreakRecord>(&format!(
            "SELECT {STREAK_COLUMNS} FROM streaks WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(record.map(StreakState::from))
    }

    /// The user's record, inserting a zeroed one first if there is none
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<StreakState> {
        sqlx::query("INSERT INTO streaks (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;

        let record = sqlx::query_as::<_, StreakRecord>(&format!(
            "SELECT {STREAK_COLUMNS} FROM streaks WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(record.into())
    }

    /// Insert or overwrite the user's record
    pub async fn save<'e, E: PgExecutor<'e>>(executor: E, state: &StreakState) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO streaks (
                user_id, current_streak, longest_streak, last_workout_date,
                streak_start_date, total_points, level
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                current_streak = EXCLUDED.current_streak,
                longest_streak = EXCLUDED.longest_streak,
                last_workout_date = EXCLUDED.last_workout_date,
                streak_start_date = EXCLUDED.streak_start_date,
                total_points = EXCLUDED.total_points,
                level = EXCLUDED.level,
                updated_at = NOW()
            "#,
        )
        .bind(state.user_id)
        .bind(state.current_streak)
        .bind(state.longest_streak)
        .bind(state.last_workout_date)
        .bind(state.streak_start_date)
        .bind(state.total_points)
        .bind(state.level)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Top `limit` records in leaderboard order, joined with the owner's name
    pub async fn leaderboard_rows(pool: &PgPool, limit: usize) -> Result<Vec<LeaderboardRow>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = sqlx::query_as::<_, LeaderboardRecord>(
            r#"
            SELECT s.user_id, u.name, s.total_points, s.level,
                   s.current_streak, s.longest_streak
            FROM streaks s
            JOIN users u ON u.id = s.user_id
            ORDER BY s.total_points DESC, s.longest_streak DESC, s.user_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|r| LeaderboardRow {
                user_id: r.user_id,
                name: r.name,
                total_points: r.total_points,
                level: r.level,
                current_streak: r.current_streak,
                longest_streak: r.longest_streak,
            })
            .collect())
    }
}
