//! Streak and leaderboard routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::StreakService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use fitness_tracker_shared::types::{LeaderboardQuery, LeaderboardResponse, StreakResponse};

pub fn streak_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_streak))
        .route("/update", post(update_streak))
        .route("/leaderboard", get(leaderboard))
}

/// GET /api/v1/streak - created zeroed on first read
async fn get_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StreakResponse>> {
    let streak = StreakService::get(state.db(), auth.user_id).await?;
    Ok(Json(streak.into()))
}

/// POST /api/v1/streak/update - record activity for today
async fn update_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<StreakResponse>> {
    let streak =
        StreakService::record_activity(state.db(), state.locks(), auth.user_id, Utc::now()).await?;
    Ok(Json(streak.into()))
}

/// GET /api/v1/streak/leaderboard?limit=
async fn leaderboard(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<LeaderboardResponse>> {
    let entries = StreakService::leaderboard(
        state.db(),
        query.limit,
        state.config().leaderboard.limit,
    )
    .await?;
    Ok(Json(LeaderboardResponse { entries }))
}
