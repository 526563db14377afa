//! End-to-end progress flows: workouts, streaks, achievements, goals,
//! leaderboard and templates

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

fn names(achievements: &Value) -> Vec<String> {
    achievements
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_first_workout_starts_streak_and_unlocks_first_step() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;

    let body = app.log_workout(&user, "cardio", 30, 250).await;

    assert_eq!(body["streak"]["current_streak"], 1);
    assert_eq!(body["streak"]["longest_streak"], 1);
    assert_eq!(body["streak"]["total_points"], 10);
    assert_eq!(names(&body["newly_unlocked"]), vec!["First Step"]);

    // Same day: streak unchanged, nothing new unlocked
    let body = app.log_workout(&user, "cardio", 30, 250).await;
    assert_eq!(body["streak"]["current_streak"], 1);
    assert!(body["newly_unlocked"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_check_is_idempotent() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    app.log_workout(&user, "strength", 45, 300).await;

    let check = "/api/v1/achievements/check";
    let (status, first) = app.post(check, Some(&user.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = app.post(check, Some(&user.token), json!({})).await;

    assert!(first["newly_unlocked"].as_array().unwrap().is_empty());
    assert!(second["newly_unlocked"].as_array().unwrap().is_empty());
    assert_eq!(first["total_points"], second["total_points"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_user_achievements_list_unlocked_first() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    app.log_workout(&user, "yoga", 20, 80).await;

    let (status, body) = app.get("/api/v1/achievements/user", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert!(rows.len() > 1);
    assert_eq!(rows[0]["achievement"]["name"], "First Step");
    assert_eq!(rows[0]["is_unlocked"], true);
    assert!(rows[1..].iter().all(|r| r["is_unlocked"] == false));

    let (_, catalog) = app.get("/api/v1/achievements", Some(&user.token)).await;
    assert_eq!(catalog.as_array().unwrap().len(), rows.len());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_health_metric_without_streak_unlocks_nothing() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/health-metrics",
            Some(&user.token),
            json!({
                "steps": 9000,
                "weight": 80.5,
                "blood_pressure": { "systolic": 120, "diastolic": 80 }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blood_pressure"]["systolic"], 120);

    let (_, streak) = app.get("/api/v1/streak", Some(&user.token)).await;
    assert_eq!(streak["current_streak"], 0);
    assert_eq!(streak["total_points"], 0);
    assert_eq!(streak["level"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_crisis_blood_pressure_reading_is_stored() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/health-metrics",
            Some(&user.token),
            json!({ "blood_pressure": { "systolic": 270, "diastolic": 120 } }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blood_pressure"]["systolic"], 270);
    assert_eq!(body["blood_pressure"]["diastolic"], 120);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_goal_progress_completes_and_unlocks_goal_crusher() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;

    let start = Utc::now() - Duration::hours(1);
    let (status, goal) = app
        .post(
            "/api/v1/goals",
            Some(&user.token),
            json!({
                "title": "Two sessions",
                "goal_type": "workout_frequency",
                "target_value": 2,
                "unit": "workouts",
                "start_date": start,
                "target_date": Utc::now() + Duration::days(30)
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(goal["milestones"].as_array().unwrap().len(), 4);
    let path = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    app.log_workout(&user, "cardio", 30, 200).await;
    let (status, body) = app.put(&path, Some(&user.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["progress_percent"], 50.0);

    app.log_workout(&user, "cardio", 30, 200).await;
    let (_, body) = app.put(&path, Some(&user.token), json!({})).await;
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    let (_, rows) = app.get("/api/v1/achievements/user", Some(&user.token)).await;
    let crusher = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["achievement"]["name"] == "Goal Crusher")
        .unwrap();
    assert_eq!(crusher["is_unlocked"], true);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_marking_goal_completed_unlocks_and_reopening_clears_timestamp() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;

    let (_, goal) = app
        .post(
            "/api/v1/goals",
            Some(&user.token),
            json!({
                "title": "Hydrate",
                "goal_type": "custom",
                "target_value": 8,
                "unit": "glasses",
                "target_date": Utc::now() + Duration::days(7)
            }),
        )
        .await;
    let path = format!("/api/v1/goals/{}", goal["id"].as_str().unwrap());

    let (status, body) = app.put(&path, Some(&user.token), json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    let (_, rows) = app.get("/api/v1/achievements/user", Some(&user.token)).await;
    let crusher = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["achievement"]["name"] == "Goal Crusher")
        .unwrap();
    assert_eq!(crusher["is_unlocked"], true);

    let (status, body) = app.put(&path, Some(&user.token), json!({ "status": "active" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert!(body["completed_at"].is_null());

    let (_, body) = app.put(&path, Some(&user.token), json!({ "title": "Hydrate more" })).await;
    assert_eq!(body["status"], "active");
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_goal_of_another_user_is_not_found() {
    let app = common::TestApp::new().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;

    let (_, goal) = app
        .post(
            "/api/v1/goals",
            Some(&owner.token),
            json!({
                "title": "Steps",
                "goal_type": "steps",
                "target_value": 10000,
                "unit": "steps",
                "target_date": Utc::now() + Duration::days(7)
            }),
        )
        .await;
    let path = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    let (status, _) = app.put(&path, Some(&other.token), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_leaderboard_ranks_by_points() {
    let app = common::TestApp::new().await;
    let user = app.register_user().await;
    app.log_workout(&user, "hiit", 25, 300).await;

    let (status, body) = app.get("/api/v1/streak/leaderboard?limit=500", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["entries"].as_array().unwrap();
    assert!(entries.len() <= 50);
    let points: Vec<i64> = entries.iter().map(|e| e["total_points"].as_i64().unwrap()).collect();
    assert!(points.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(entries[0]["rank"], 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_templates_visibility_and_use() {
    let app = common::TestApp::new().await;
    let author = app.register_user().await;
    let other = app.register_user().await;

    let (status, created) = app
        .post(
            "/api/v1/templates",
            Some(&author.token),
            json!({
                "name": "Lunch Run",
                "difficulty": "beginner",
                "category": "cardio",
                "duration_minutes": 25,
                "estimated_calories": 220,
                "exercises": [{ "name": "Easy run", "duration": 25 }],
                "tags": ["run"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_public"], false);
    let id = created["id"].as_str().unwrap();

    let (status, _) = app.get(&format!("/api/v1/templates/{id}"), Some(&other.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, used) = app
        .post(&format!("/api/v1/templates/{id}/use"), Some(&author.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(used["template"]["usage_count"], 1);
    assert_eq!(used["draft"]["exercise_name"], "Lunch Run");
    assert_eq!(used["draft"]["intensity"], "low");

    let (_, list) = app
        .get("/api/v1/templates?difficulty=beginner", Some(&other.token))
        .await;
    let listed = list.as_array().unwrap();
    assert!(listed.iter().all(|t| t["difficulty"] == "beginner"));
    assert!(listed.iter().all(|t| t["id"] != created["id"]));
}
