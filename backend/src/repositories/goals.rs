//! Goals repository for database operations

use super::{parse_column, to_decimal, to_f64};
use anyhow::Result;
use chrono::{DateTime, Utc};
use fitness_tracker_shared::models::{Goal, GoalPriority, GoalStatus, GoalType, Milestone};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Goals
// ============================================================================

/// Goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: String,
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub status: String,
    pub priority: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GoalRecord {
    fn into_goal(self, milestones: Vec<Milestone>) -> Result<Goal> {
        Ok(Goal {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            goal_type: parse_column("goal_type", &self.goal_type)?,
            target_value: to_f64(self.target_value),
            current_value: to_f64(self.current_value),
            unit: self.unit,
            start_date: self.start_date,
            target_date: self.target_date,
            status: parse_column("status", &self.status)?,
            priority: parse_column("priority", &self.priority)?,
            milestones,
            completed_at: self.completed_at,
        })
    }
}

/// Milestone record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MilestoneRecord {
    pub goal_id: Uuid,
    pub percentage: i32,
    pub target_value: Decimal,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

impl From<MilestoneRecord> for Milestone {
    fn from(record: MilestoneRecord) -> Self {
        Milestone {
            percentage: record.percentage,
            value: to_f64(record.target_value),
            achieved: record.achieved,
            achieved_at: record.achieved_at,
        }
    }
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub priority: GoalPriority,
}

/// Input for updating a goal
#[derive(Debug, Clone, Default)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub status: Option<GoalStatus>,
    pub priority: Option<GoalPriority>,
    /// Written only when `status` is set
    pub completed_at: Option<DateTime<Utc>>,
}

const GOAL_COLUMNS: &str = "id, user_id, title, description, goal_type, target_value, \
                            current_value, unit, start_date, target_date, status, priority, \
                            completed_at, created_at";

/// Goal repository
pub struct GoalRepository;

impl GoalRepository {
    /// Create a goal with its four standard milestones
    pub async fn create(pool: &PgPool, input: NewGoal) -> Result<Goal> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            INSERT INTO goals (
                user_id, title, description, goal_type, target_value,
                current_value, unit, start_date, target_date, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {GOAL_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.goal_type.as_str())
        .bind(to_decimal(input.target_value)?)
        .bind(to_decimal(input.current_value)?)
        .bind(&input.unit)
        .bind(input.start_date)
        .bind(input.target_date)
        .bind(input.priority.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let milestones = Milestone::standard_set(input.target_value);
        for milestone in &milestones {
            sqlx::query(
                r#"
                INSERT INTO goal_milestones (goal_id, percentage, target_value)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(record.id)
            .bind(milestone.percentage)
            .bind(to_decimal(milestone.value)?)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        record.into_goal(milestones)
    }

    /// Get a goal owned by `user_id`
    pub async fn find_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Goal>> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        match record {
            Some(record) => {
                let milestones = Self::milestones_for(pool, &[record.id])
                    .await?
                    .remove(&record.id)
                    .unwrap_or_default();
                Ok(Some(record.into_goal(milestones)?))
            }
            None => Ok(None),
        }
    }

    /// A user's goals, newest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<GoalStatus>,
        goal_type: Option<GoalType>,
    ) -> Result<Vec<Goal>> {
        let records = sqlx::query_as::<_, GoalRecord>(&format!(
            r#"
            SELECT {GOAL_COLUMNS}
            FROM goals
            WHERE user_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR goal_type = $3)
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .bind(goal_type.map(|t| t.as_str()))
        .fetch_all(pool)
        .await?;

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut milestones = Self::milestones_for(pool, &ids).await?;

        records
            .into_iter()
            .map(|record| {
                let own = milestones.remove(&record.id).unwrap_or_default();
                record.into_goal(own)
            })
            .collect()
    }

    async fn milestones_for(
        pool: &PgPool,
        goal_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Milestone>>> {
        let records = sqlx::query_as::<_, MilestoneRecord>(
            r#"
            SELECT goal_id, percentage, target_value, achieved, achieved_at
            FROM goal_milestones
            WHERE goal_id = ANY($1)
            ORDER BY goal_id, percentage ASC
            "#,
        )
        .bind(goal_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Milestone>> = HashMap::new();
        for record in records {
            grouped.entry(record.goal_id).or_default().push(record.into());
        }
        Ok(grouped)
    }

    /// Apply a user edit on the caller's connection.
    ///
    /// `completed_at` is written whenever the edit carries a status, so
    /// leaving `completed` clears it. Returns false if the goal is missing.
    pub async fn update(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
        updates: UpdateGoal,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE goals SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                target_value = COALESCE($5, target_value),
                unit = COALESCE($6, unit),
                target_date = COALESCE($7, target_date),
                status = COALESCE($8, status),
                priority = COALESCE($9, priority),
                completed_at = CASE WHEN $8::text IS NULL THEN completed_at ELSE $10 END,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&updates.title)
        .bind(&updates.description)
        .bind(updates.target_value.map(to_decimal).transpose()?)
        .bind(&updates.unit)
        .bind(updates.target_date)
        .bind(updates.status.map(|s| s.as_str()))
        .bind(updates.priority.map(|p| p.as_str()))
        .bind(updates.completed_at)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Persist a recompute: current value, status, completion and milestones.
    ///
    /// Runs on the caller's connection so a completion can share a
    /// transaction with the achievement pass. Milestones are only ever
    /// flipped to achieved here.
    pub async fn save_progress(conn: &mut PgConnection, goal: &Goal) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE goals SET
                current_value = $3,
                status = $4,
                completed_at = $5,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(to_decimal(goal.current_value.max(0.0))?)
        .bind(goal.status.as_str())
        .bind(goal.completed_at)
        .execute(&mut *conn)
        .await?;

        for milestone in goal.milestones.iter().filter(|m| m.achieved) {
            sqlx::query(
                r#"
                UPDATE goal_milestones SET achieved = TRUE, achieved_at = $3
                WHERE goal_id = $1 AND percentage = $2 AND NOT achieved
                "#,
            )
            .bind(goal.id)
            .bind(milestone.percentage)
            .bind(milestone.achieved_at)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Delete a goal (milestones cascade)
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of goals the user has completed
    pub async fn count_completed<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM goals WHERE user_id = $1 AND status = 'completed'")
                .bind(user_id)
                .fetch_one(executor)
                .await?;

        Ok(count.0)
    }
}
