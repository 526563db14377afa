//! Workout template routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TemplateService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fitness_tracker_shared::models::WorkoutTemplate;
use fitness_tracker_shared::types::{CreateTemplateRequest, TemplateListQuery, UseTemplateResponse};
use uuid::Uuid;

pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/:id", get(get_template))
        .route("/:id/use", post(use_template))
}

/// GET /api/v1/templates?difficulty=&category=
async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TemplateListQuery>,
) -> ApiResult<Json<Vec<WorkoutTemplate>>> {
    let templates = TemplateService::list(state.db(), auth.user_id, &query).await?;
    Ok(Json(templates))
}

async fn get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkoutTemplate>> {
    let template = TemplateService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(template))
}

/// POST /api/v1/templates - private to the caller
async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<WorkoutTemplate>)> {
    let template = TemplateService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn use_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UseTemplateResponse>> {
    let response = TemplateService::use_template(state.db(), auth.user_id, id).await?;
    Ok(Json(response))
}
