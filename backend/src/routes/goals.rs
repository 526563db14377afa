//! Goal routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::GoalService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use fitness_tracker_shared::types::{
    CreateGoalRequest, GoalProgressRequest, GoalResponse, GoalsListQuery, MessageResponse,
    UpdateGoalRequest,
};
use uuid::Uuid;

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/:id", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/:id/progress", put(update_progress))
}

/// GET /api/v1/goals - newest first
async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<GoalsListQuery>,
) -> ApiResult<Json<Vec<GoalResponse>>> {
    let goals = GoalService::list(state.db(), auth.user_id, &query).await?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

/// POST /api/v1/goals - the goal is created with its 25/50/75/100% milestones
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<GoalResponse>)> {
    let goal = GoalService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(goal.into())))
}

async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GoalResponse>> {
    let goal = GoalService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(goal.into()))
}

async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateGoalRequest>,
) -> ApiResult<Json<GoalResponse>> {
    let goal = GoalService::update(state.db(), state.locks(), auth.user_id, id, req).await?;
    Ok(Json(goal.into()))
}

async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    GoalService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(MessageResponse::new("Goal deleted")))
}

/// PUT /api/v1/goals/:id/progress
///
/// Recomputes the goal from the user's workouts and metrics. A body with
/// `current_value` is only read for custom goals; an empty body is fine.
async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    body: Option<Json<GoalProgressRequest>>,
) -> ApiResult<Json<GoalResponse>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let goal =
        GoalService::update_progress(state.db(), state.locks(), auth.user_id, id, req).await?;
    Ok(Json(goal.into()))
}
