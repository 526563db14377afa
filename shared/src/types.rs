//! API request and response types

use crate::aggregates::WorkoutAggregates;
use crate::leaderboard::LeaderboardEntry;
use crate::models::{
    Achievement, AchievementProgress, BloodPressure, Difficulty, Goal, GoalPriority, GoalStatus,
    GoalType, Intensity, StreakState, TemplateExercise, UserAchievement, Workout, WorkoutCategory,
    WorkoutTemplate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Auth
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Register/login response: the account plus a fresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Optional profile fields shared by registration and profile updates
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileFields {
    #[validate(range(min = 1, max = 150))]
    pub age: Option<i32>,
    /// Kilograms
    #[validate(range(min = 0.0, max = 500.0))]
    pub weight: Option<f64>,
    /// Centimetres
    #[validate(range(min = 0.0, max = 300.0))]
    pub height: Option<f64>,
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    #[validate(length(max = 200))]
    pub fitness_goal: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileFields,
}

/// Profile update; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileFields,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
    pub created_at: DateTime<Utc>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// Log a workout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, max = 200, message = "Exercise name is required"))]
    pub exercise_name: String,
    pub category: Option<WorkoutCategory>,
    #[validate(range(min = 1, max = 1440, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Calories burned cannot be negative"))]
    pub calories_burned: i32,
    pub intensity: Option<Intensity>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Partial workout update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 200))]
    pub exercise_name: Option<String>,
    pub category: Option<WorkoutCategory>,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub calories_burned: Option<i32>,
    pub intensity: Option<Intensity>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Filters for the workout list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutListQuery {
    pub category: Option<WorkoutCategory>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Result of logging a workout: the record plus the progress it caused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWorkoutResponse {
    pub workout: Workout,
    pub streak: StreakState,
    pub newly_unlocked: Vec<Achievement>,
}

/// Lifetime workout statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutStatsResponse {
    #[serde(flatten)]
    pub aggregates: WorkoutAggregates,
    /// Average minutes per workout, 0 with no workouts
    pub average_duration: f64,
}

impl From<WorkoutAggregates> for WorkoutStatsResponse {
    fn from(aggregates: WorkoutAggregates) -> Self {
        let average_duration = if aggregates.workout_count > 0 {
            aggregates.total_duration as f64 / aggregates.workout_count as f64
        } else {
            0.0
        };
        Self {
            aggregates,
            average_duration,
        }
    }
}

// ============================================================================
// Health metrics
// ============================================================================

/// Record a health metric entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateHealthMetricRequest {
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Steps cannot be negative"))]
    pub steps: i64,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 0.0, message = "Water intake cannot be negative"))]
    pub water_intake_liters: Option<f64>,
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
    #[validate(range(min = 30, max = 250, message = "Heart rate must be between 30 and 250"))]
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
}

/// Partial health metric update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateHealthMetricRequest {
    pub date: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub steps: Option<i64>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub sleep_hours: Option<f64>,
    #[validate(range(min = 0.0))]
    pub water_intake_liters: Option<f64>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    #[validate(range(min = 30, max = 250))]
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
}

// ============================================================================
// Goals
// ============================================================================

/// Create a goal
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Current value cannot be negative"))]
    pub current_value: f64,
    #[validate(length(min = 1, max = 50, message = "Unit is required"))]
    pub unit: String,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: DateTime<Utc>,
    pub priority: Option<GoalPriority>,
}

/// Partial goal update. Milestone values stay as created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub target_value: Option<f64>,
    #[validate(length(min = 1, max = 50))]
    pub unit: Option<String>,
    pub target_date: Option<DateTime<Utc>>,
    pub status: Option<GoalStatus>,
    pub priority: Option<GoalPriority>,
}

/// Recompute a goal; `current_value` is only read for custom goals
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GoalProgressRequest {
    #[validate(range(min = 0.0))]
    pub current_value: Option<f64>,
}

/// Goal with its derived completion percentage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress_percent: f64,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        let progress_percent = goal.progress_percent();
        Self {
            goal,
            progress_percent,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalsListQuery {
    pub status: Option<GoalStatus>,
    pub goal_type: Option<GoalType>,
}

// ============================================================================
// Streaks, achievements, leaderboard
// ============================================================================

/// Streak record with the points still needed for the next level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakResponse {
    #[serde(flatten)]
    pub streak: StreakState,
    pub points_to_next_level: i64,
}

impl From<StreakState> for StreakResponse {
    fn from(streak: StreakState) -> Self {
        let next_level_at = i64::from(streak.level) * crate::streak::POINTS_PER_LEVEL;
        Self {
            points_to_next_level: (next_level_at - streak.total_points).max(0),
            streak,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

/// A user's row joined with the catalog entry it tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAchievementResponse {
    pub achievement: Achievement,
    pub progress: AchievementProgress,
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl UserAchievementResponse {
    pub fn new(achievement: Achievement, row: UserAchievement) -> Self {
        Self {
            achievement,
            progress: row.progress,
            is_unlocked: row.is_unlocked,
            unlocked_at: row.unlocked_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementCheckResponse {
    pub newly_unlocked: Vec<Achievement>,
    pub total_points: i64,
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateListQuery {
    pub difficulty: Option<Difficulty>,
    pub category: Option<WorkoutCategory>,
}

/// Author a private template
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    pub difficulty: Difficulty,
    pub category: WorkoutCategory,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub estimated_calories: i32,
    #[validate(length(min = 1, message = "A template needs at least one exercise"))]
    pub exercises: Vec<TemplateExercise>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Workout pre-filled from a template, ready to be edited and logged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDraft {
    pub exercise_name: String,
    pub category: WorkoutCategory,
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub intensity: Intensity,
    pub notes: Option<String>,
}

impl From<&WorkoutTemplate> for WorkoutDraft {
    fn from(template: &WorkoutTemplate) -> Self {
        let steps: Vec<&str> = template.exercises.iter().map(|e| e.name.as_str()).collect();
        Self {
            exercise_name: template.name.clone(),
            category: template.category,
            duration_minutes: template.duration_minutes,
            calories_burned: template.estimated_calories,
            intensity: template.difficulty.default_intensity(),
            notes: (!steps.is_empty()).then(|| steps.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseTemplateResponse {
    pub template: WorkoutTemplate,
    pub draft: WorkoutDraft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_templates;

    #[test]
    fn test_register_request_rules() {
        let valid: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "secret1",
            "age": 30
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        assert_eq!(valid.profile.age, Some(30));

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..valid.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_create_workout_defaults_and_ranges() {
        let req: CreateWorkoutRequest = serde_json::from_value(serde_json::json!({
            "exercise_name": "Run",
            "duration_minutes": 30
        }))
        .unwrap();
        assert_eq!(req.calories_burned, 0);
        assert!(req.category.is_none());
        assert!(req.validate().is_ok());

        let zero_minutes = CreateWorkoutRequest {
            duration_minutes: 0,
            ..req.clone()
        };
        assert!(zero_minutes.validate().is_err());

        let empty_name = CreateWorkoutRequest {
            exercise_name: String::new(),
            ..req
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_health_metric_ranges() {
        let ok = CreateHealthMetricRequest {
            heart_rate: Some(72),
            sleep_hours: Some(7.5),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        for bad in [
            CreateHealthMetricRequest { heart_rate: Some(20), ..Default::default() },
            CreateHealthMetricRequest { sleep_hours: Some(25.0), ..Default::default() },
            CreateHealthMetricRequest { steps: -1, ..Default::default() },
            CreateHealthMetricRequest { weight: Some(-3.0), ..Default::default() },
        ] {
            assert!(bad.validate().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_streak_response_points_to_next_level() {
        let mut streak = StreakState::new(Uuid::nil());
        streak.total_points = 130;
        streak.level = 2;
        assert_eq!(StreakResponse::from(streak).points_to_next_level, 70);
    }

    #[test]
    fn test_draft_from_template() {
        let definition = default_templates().remove(4);
        let template = WorkoutTemplate {
            id: Uuid::new_v4(),
            name: definition.name,
            description: definition.description,
            difficulty: definition.difficulty,
            category: definition.category,
            duration_minutes: definition.duration_minutes,
            estimated_calories: definition.estimated_calories,
            exercises: definition.exercises,
            is_public: true,
            created_by: None,
            usage_count: 3,
            tags: definition.tags,
        };

        let draft = WorkoutDraft::from(&template);

        assert_eq!(draft.exercise_name, "Full Body Power");
        assert_eq!(draft.intensity, Intensity::High);
        assert_eq!(draft.duration_minutes, 45);
        assert_eq!(draft.calories_burned, 250);
        assert!(draft.notes.unwrap().starts_with("Barbell Squats, Bench Press"));
    }
}
