//! Workout template service

use crate::error::ApiError;
use crate::repositories::TemplateRepository;
use fitness_tracker_shared::models::WorkoutTemplate;
use fitness_tracker_shared::types::{
    CreateTemplateRequest, TemplateListQuery, UseTemplateResponse, WorkoutDraft,
};
use fitness_tracker_shared::validation::{describe, required_text};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct TemplateService;

impl TemplateService {
    /// Public templates plus the caller's own
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        query: &TemplateListQuery,
    ) -> Result<Vec<WorkoutTemplate>, ApiError> {
        TemplateRepository::list_visible(pool, user_id, query.difficulty, query.category)
            .await
            .map_err(ApiError::Internal)
    }

    /// Someone else's private template reads as not found
    pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<WorkoutTemplate, ApiError> {
        TemplateRepository::find_visible(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))
    }

    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateTemplateRequest,
    ) -> Result<WorkoutTemplate, ApiError> {
        req.validate().map_err(|e| ApiError::Validation(describe(&e)))?;
        required_text("Name", &req.name).map_err(ApiError::Validation)?;
        for exercise in &req.exercises {
            required_text("Exercise name", &exercise.name).map_err(ApiError::Validation)?;
        }

        let template = TemplateRepository::create_private(pool, user_id, &req)
            .await
            .map_err(ApiError::Internal)?;

        tracing::info!(%user_id, template_id = %template.id, "Template created");
        Ok(template)
    }

    /// Count a use and hand back a workout draft to edit and log
    pub async fn use_template(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<UseTemplateResponse, ApiError> {
        let template = TemplateRepository::increment_usage(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

        let draft = WorkoutDraft::from(&template);
        Ok(UseTemplateResponse { template, draft })
    }
}
