//! Achievement routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AchievementService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use fitness_tracker_shared::models::Achievement;
use fitness_tracker_shared::types::{AchievementCheckResponse, UserAchievementResponse};

pub fn achievement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog))
        .route("/user", get(user_achievements))
        .route("/check", post(check))
}

async fn catalog(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<Achievement>>> {
    let achievements = AchievementService::catalog(state.db()).await?;
    Ok(Json(achievements))
}

async fn user_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserAchievementResponse>>> {
    let rows = AchievementService::user_achievements(state.db(), auth.user_id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/achievements/check - evaluate now, return what unlocked
async fn check(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AchievementCheckResponse>> {
    let response = AchievementService::check(state.db(), state.locks(), auth.user_id).await?;
    Ok(Json(response))
}
