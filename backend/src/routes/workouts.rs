//! Workout routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use fitness_tracker_shared::models::Workout;
use fitness_tracker_shared::types::{
    CreateWorkoutRequest, LogWorkoutResponse, MessageResponse, UpdateWorkoutRequest,
    WorkoutListQuery, WorkoutStatsResponse,
};
use uuid::Uuid;

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(log_workout))
        .route("/stats", get(workout_stats))
        .route(
            "/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
}

/// GET /api/v1/workouts - newest first, filterable by category and date range
async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WorkoutListQuery>,
) -> ApiResult<Json<Vec<Workout>>> {
    let workouts = WorkoutService::list(state.db(), auth.user_id, &query).await?;
    Ok(Json(workouts))
}

/// POST /api/v1/workouts
///
/// Returns the stored workout with the updated streak and any achievements
/// it unlocked.
async fn log_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> ApiResult<(StatusCode, Json<LogWorkoutResponse>)> {
    let response = WorkoutService::log(state.db(), state.locks(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn workout_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<WorkoutStatsResponse>> {
    let stats = WorkoutService::stats(state.db(), auth.user_id).await?;
    Ok(Json(stats))
}

async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Workout>> {
    let workout = WorkoutService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(workout))
}

async fn update_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> ApiResult<Json<Workout>> {
    let workout = WorkoutService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(workout))
}

async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    WorkoutService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("Workout deleted")))
}
