//! Achievement catalog and per-user achievement rows

use super::parse_column;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use fitness_tracker_shared::models::{
    Achievement, AchievementDefinition, AchievementProgress, Requirement, UserAchievement,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Catalog row; the requirement is spread over three columns
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub requirement_type: String,
    pub requirement_value: i64,
    pub requirement_category: Option<String>,
    pub points: i64,
    pub rarity: String,
}

impl TryFrom<AchievementRecord> for Achievement {
    type Error = anyhow::Error;

    fn try_from(record: AchievementRecord) -> Result<Self> {
        let category_type = record
            .requirement_category
            .as_deref()
            .map(|raw| parse_column("requirement_category", raw))
            .transpose()?;

        Ok(Achievement {
            id: record.id,
            name: record.name,
            description: record.description,
            icon: record.icon,
            category: parse_column("category", &record.category)?,
            requirement: Requirement {
                kind: parse_column("requirement_type", &record.requirement_type)?,
                value: record.requirement_value,
                category_type,
            },
            points: record.points,
            rarity: parse_column("rarity", &record.rarity)?,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAchievementRecord {
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    pub progress_current: i64,
    pub progress_target: i64,
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl From<UserAchievementRecord> for UserAchievement {
    fn from(record: UserAchievementRecord) -> Self {
        UserAchievement {
            user_id: record.user_id,
            achievement_id: record.achievement_id,
            progress: AchievementProgress {
                current: record.progress_current,
                target: record.progress_target,
            },
            is_unlocked: record.is_unlocked,
            unlocked_at: record.unlocked_at,
        }
    }
}

const ACHIEVEMENT_COLUMNS: &str = "id, name, description, icon, category, requirement_type, \
                                   requirement_value, requirement_category, points, rarity";

pub struct AchievementRepository;

impl AchievementRepository {
    /// Insert or refresh a catalog entry by name
    pub async fn upsert(
        pool: &PgPool,
        definition: &AchievementDefinition,
        display_order: i32,
    ) -> Result<Achievement> {
        let record = sqlx::query_as::<_, AchievementRecord>(&format!(
            r#"
            INSERT INTO achievements (
                name, description, icon, category, requirement_type,
                requirement_value, requirement_category, points, rarity, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (name) DO UPDATE SET
                description = EXCLUDED.description,
                icon = EXCLUDED.icon,
                category = EXCLUDED.category,
                requirement_type = EXCLUDED.requirement_type,
                requirement_value = EXCLUDED.requirement_value,
                requirement_category = EXCLUDED.requirement_category,
                points = EXCLUDED.points,
                rarity = EXCLUDED.rarity,
                display_order = EXCLUDED.display_order
            RETURNING {ACHIEVEMENT_COLUMNS}
            "#
        ))
        .bind(&definition.name)
        .bind(&definition.description)
        .bind(&definition.icon)
        .bind(definition.category.as_str())
        .bind(definition.requirement.kind.as_str())
        .bind(definition.requirement.value)
        .bind(definition.requirement.category_type.map(|c| c.as_str()))
        .bind(definition.points)
        .bind(definition.rarity.as_str())
        .bind(display_order)
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// The whole catalog in display order
    pub async fn list<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Achievement>> {
        let records = sqlx::query_as::<_, AchievementRecord>(&format!(
            "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements ORDER BY display_order, name"
        ))
        .fetch_all(executor)
        .await?;

        records.into_iter().map(Achievement::try_from).collect()
    }
}

pub struct UserAchievementRepository;

impl UserAchievementRepository {
    pub async fn list_by_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<UserAchievement>> {
        let records = sqlx::query_as::<_, UserAchievementRecord>(
            r#"
            SELECT user_id, achievement_id, progress_current, progress_target,
                   is_unlocked, unlocked_at
            FROM user_achievements
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(records.into_iter().map(UserAchievement::from).collect())
    }

    /// Create or refresh a row. Unlocked rows are never modified.
    pub async fn upsert<'e, E: PgExecutor<'e>>(executor: E, row: &UserAchievement) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_achievements (
                user_id, achievement_id, progress_current, progress_target,
                is_unlocked, unlocked_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, achievement_id) DO UPDATE SET
                progress_current = EXCLUDED.progress_current,
                progress_target = EXCLUDED.progress_target,
                is_unlocked = EXCLUDED.is_unlocked,
                unlocked_at = EXCLUDED.unlocked_at
            WHERE NOT user_achievements.is_unlocked
            "#,
        )
        .bind(row.user_id)
        .bind(row.achievement_id)
        .bind(row.progress.current)
        .bind(row.progress.target)
        .bind(row.is_unlocked)
        .bind(row.unlocked_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// The user's rows joined with the catalog: unlocked first (latest
    /// unlock first), then the rest in catalog order
    pub async fn list_with_catalog(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<(Achievement, UserAchievement)>> {
        #[derive(sqlx::FromRow)]
        struct Joined {
            #[sqlx(flatten)]
            achievement: AchievementRecord,
            #[sqlx(flatten)]
            row: UserAchievementRecord,
        }

        let joined = sqlx::query_as::<_, Joined>(
            r#"
            SELECT a.id, a.name, a.description, a.icon, a.category, a.requirement_type,
                   a.requirement_value, a.requirement_category, a.points, a.rarity,
                   ua.user_id, ua.achievement_id, ua.progress_current, ua.progress_target,
                   ua.is_unlocked, ua.unlocked_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.is_unlocked DESC, ua.unlocked_at DESC NULLS LAST, a.display_order
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        joined
            .into_iter()
            .map(|j| {
                let achievement = Achievement::try_from(j.achievement)
                    .map_err(|e| anyhow!("achievement {}: {e}", j.row.achievement_id))?;
                Ok((achievement, j.row.into()))
            })
            .collect()
    }
}
