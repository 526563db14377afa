//! Workout template repository
//!
//! Catalog templates have no owner and are public. User templates are
//! private to their author.

use super::parse_column;
use anyhow::Result;
use fitness_tracker_shared::models::{
    Difficulty, TemplateDefinition, TemplateExercise, WorkoutCategory, WorkoutTemplate,
};
use fitness_tracker_shared::types::CreateTemplateRequest;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub category: String,
    pub duration_minutes: i32,
    pub estimated_calories: i32,
    pub exercises: Json<Vec<TemplateExercise>>,
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    pub usage_count: i64,
    pub tags: Vec<String>,
}

impl TryFrom<TemplateRecord> for WorkoutTemplate {
    type Error = anyhow::Error;

    fn try_from(record: TemplateRecord) -> Result<Self> {
        Ok(WorkoutTemplate {
            id: record.id,
            name: record.name,
            description: record.description,
            difficulty: parse_column("difficulty", &record.difficulty)?,
            category: parse_column("category", &record.category)?,
            duration_minutes: record.duration_minutes,
            estimated_calories: record.estimated_calories,
            exercises: record.exercises.0,
            is_public: record.is_public,
            created_by: record.created_by,
            usage_count: record.usage_count,
            tags: record.tags,
        })
    }
}

const TEMPLATE_COLUMNS: &str = "id, name, description, difficulty, category, duration_minutes, \
                                estimated_calories, exercises, is_public, created_by, \
                                usage_count, tags";

pub struct TemplateRepository;

impl TemplateRepository {
    /// Insert or refresh a catalog template. Usage counts survive reseeding.
    pub async fn upsert_catalog(
        pool: &PgPool,
        definition: &TemplateDefinition,
    ) -> Result<WorkoutTemplate> {
        let record = sqlx::query_as::<_, TemplateRecord>(&format!(
            r#"
            INSERT INTO workout_templates (
                name, description, difficulty, category, duration_minutes,
                estimated_calories, exercises, is_public, created_by, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NULL, $8)
            ON CONFLICT (name) WHERE created_by IS NULL DO UPDATE SET
                description = EXCLUDED.description,
                difficulty = EXCLUDED.difficulty,
                category = EXCLUDED.category,
                duration_minutes = EXCLUDED.duration_minutes,
                estimated_calories = EXCLUDED.estimated_calories,
                exercises = EXCLUDED.exercises,
                is_public = TRUE,
                tags = EXCLUDED.tags
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(&definition.name)
        .bind(&definition.description)
        .bind(definition.difficulty.as_str())
        .bind(definition.category.as_str())
        .bind(definition.duration_minutes)
        .bind(definition.estimated_calories)
        .bind(Json(&definition.exercises))
        .bind(&definition.tags)
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// Store a private template owned by `user_id`
    pub async fn create_private(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreateTemplateRequest,
    ) -> Result<WorkoutTemplate> {
        let record = sqlx::query_as::<_, TemplateRecord>(&format!(
            r#"
            INSERT INTO workout_templates (
                name, description, difficulty, category, duration_minutes,
                estimated_calories, exercises, is_public, created_by, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(&req.description)
        .bind(req.difficulty.as_str())
        .bind(req.category.as_str())
        .bind(req.duration_minutes)
        .bind(req.estimated_calories)
        .bind(Json(&req.exercises))
        .bind(user_id)
        .bind(&req.tags)
        .fetch_one(pool)
        .await?;

        record.try_into()
    }

    /// Public templates plus the caller's own, most used first
    pub async fn list_visible(
        pool: &PgPool,
        user_id: Uuid,
        difficulty: Option<Difficulty>,
        category: Option<WorkoutCategory>,
    ) -> Result<Vec<WorkoutTemplate>> {
        let records = sqlx::query_as::<_, TemplateRecord>(&format!(
            r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM workout_templates
            WHERE (is_public OR created_by = $1)
              AND ($2::TEXT IS NULL OR difficulty = $2)
              AND ($3::TEXT IS NULL OR category = $3)
            ORDER BY usage_count DESC, name ASC
            "#
        ))
        .bind(user_id)
        .bind(difficulty.map(|d| d.as_str()))
        .bind(category.map(|c| c.as_str()))
        .fetch_all(pool)
        .await?;

        records.into_iter().map(WorkoutTemplate::try_from).collect()
    }

    /// A template the caller may see; `None` for unknown or someone else's private one
    pub async fn find_visible(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<WorkoutTemplate>> {
        let record = sqlx::query_as::<_, TemplateRecord>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM workout_templates \
             WHERE id = $1 AND (is_public OR created_by = $2)"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(WorkoutTemplate::try_from).transpose()
    }

    /// Bump the usage counter of a visible template and return it
    pub async fn increment_usage(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<WorkoutTemplate>> {
        let record = sqlx::query_as::<_, TemplateRecord>(&format!(
            r#"
            UPDATE workout_templates
            SET usage_count = usage_count + 1
            WHERE id = $1 AND (is_public OR created_by = $2)
            RETURNING {TEMPLATE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        record.map(WorkoutTemplate::try_from).transpose()
    }
}
