//! Health metric routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::HealthMetricService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitness_tracker_shared::models::HealthMetric;
use fitness_tracker_shared::types::{
    CreateHealthMetricRequest, MessageResponse, UpdateHealthMetricRequest,
};
use uuid::Uuid;

pub fn health_metric_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_metrics).post(create_metric))
        .route("/:id", get(get_metric).put(update_metric).delete(delete_metric))
}

async fn list_metrics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<HealthMetric>>> {
    let metrics = HealthMetricService::list(state.db(), auth.user_id).await?;
    Ok(Json(metrics))
}

async fn create_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateHealthMetricRequest>,
) -> ApiResult<(StatusCode, Json<HealthMetric>)> {
    let metric = HealthMetricService::create(state.db(), state.locks(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(metric)))
}

async fn get_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<HealthMetric>> {
    let metric = HealthMetricService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(metric))
}

async fn update_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateHealthMetricRequest>,
) -> ApiResult<Json<HealthMetric>> {
    let metric = HealthMetricService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(metric))
}

async fn delete_metric(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    HealthMetricService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("Health metric deleted")))
}
