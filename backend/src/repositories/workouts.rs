//! Workout repository

use super::parse_column;
use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::models::{Intensity, Workout, WorkoutCategory};
use fitness_tracker_shared::types::WorkoutListQuery;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Workout record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub category: String,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub intensity: String,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = anyhow::Error;

    fn try_from(record: WorkoutRecord) -> Result<Self> {
        Ok(Workout {
            id: record.id,
            user_id: record.user_id,
            exercise_name: record.exercise_name,
            category: parse_column("category", &record.category)?,
            duration_minutes: record.duration_minutes,
            calories_burned: record.calories_burned,
            intensity: parse_column("intensity", &record.intensity)?,
            notes: record.notes,
            date: record.date,
        })
    }
}

/// Input for logging a workout
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub user_id: Uuid,
    pub exercise_name: String,
    pub category: WorkoutCategory,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub intensity: Intensity,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkout {
    pub exercise_name: Option<String>,
    pub category: Option<WorkoutCategory>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

const WORKOUT_COLUMNS: &str = "id, user_id, exercise_name, category, duration_minutes, \
                               calories_burned, intensity, notes, date";

fn into_workouts(records: Vec<WorkoutRecord>) -> Result<Vec<Workout>> {
    records.into_iter().map(Workout::try_from).collect()
}

pub struct WorkoutRepository;

impl WorkoutRepository {
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, input: NewWorkout) -> Result<Workout> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            INSERT INTO workouts (
                user_id, exercise_name, category, duration_minutes,
                calories_burned, intensity, notes, date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.exercise_name)
        .bind(input.category.as_str())
        .bind(input.duration_minutes)
        .bind(input.calories_burned)
        .bind(input.intensity.as_str())
        .bind(&input.notes)
        .bind(input.date)
        .fetch_one(executor)
        .await?;

        record.try_into()
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Workout>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(Workout::try_from).transpose()
    }

    /// A user's workouts, newest first, optionally filtered
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: &WorkoutListQuery,
    ) -> Result<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::timestamptz IS NULL OR date >= $3)
              AND ($4::timestamptz IS NULL OR date <= $4)
            ORDER BY date DESC
            "#
        ))
        .bind(user_id)
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await?;

        into_workouts(records)
    }

    /// Every workout of a user, the input of the aggregate reader
    pub async fn all_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE user_id = $1 ORDER BY date ASC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        into_workouts(records)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateWorkout,
    ) -> Result<Option<Workout>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(&format!(
            r#"
            UPDATE workouts SET
                exercise_name = COALESCE($3, exercise_name),
                category = COALESCE($4, category),
                duration_minutes = COALESCE($5, duration_minutes),
                calories_burned = COALESCE($6, calories_burned),
                intensity = COALESCE($7, intensity),
                notes = COALESCE($8, notes),
                date = COALESCE($9, date),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&updates.exercise_name)
        .bind(updates.category.map(|c| c.as_str()))
        .bind(updates.duration_minutes)
        .bind(updates.calories_burned)
        .bind(updates.intensity.map(|i| i.as_str()))
        .bind(&updates.notes)
        .bind(updates.date)
        .fetch_optional(pool)
        .await?;

        record.map(Workout::try_from).transpose()
    }

    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, intensity: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            exercise_name: "Bike".to_string(),
            category: category.to_string(),
            duration_minutes: 40,
            calories_burned: 320,
            intensity: intensity.to_string(),
            notes: None,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_record_converts_to_workout() {
        let workout = Workout::try_from(record("cardio", "high")).unwrap();
        assert_eq!(workout.category, WorkoutCategory::Cardio);
        assert_eq!(workout.intensity, Intensity::High);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Workout::try_from(record("swimming", "low")).is_err());
    }
}
