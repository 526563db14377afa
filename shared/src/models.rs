//! Data models for the Fitness Tracker application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a fieldless enum stored as snake_case text.
///
/// Generates `ALL`, `as_str`, `Display` and a `FromStr` whose error lists the
/// accepted values, so database text columns and query strings share one
/// spelling with the serde representation.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        stringify!($name),
                        other,
                        [$($text),+].join(", ")
                    )),
                }
            }
        }
    };
}

// ============================================================================
// Workouts
// ============================================================================

text_enum! {
    /// Workout category
    pub enum WorkoutCategory {
        Cardio => "cardio",
        Strength => "strength",
        Flexibility => "flexibility",
        Sports => "sports",
        Other => "other",
    }
}

impl Default for WorkoutCategory {
    fn default() -> Self {
        WorkoutCategory::Other
    }
}

text_enum! {
    /// Perceived workout intensity
    pub enum Intensity {
        Low => "low",
        Moderate => "moderate",
        High => "high",
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Intensity::Moderate
    }
}

/// A logged workout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub category: WorkoutCategory,
    /// Minutes, at least 1
    pub duration_minutes: i32,
    pub calories_burned: i32,
    pub intensity: Intensity,
    pub notes: Option<String>,
    /// When the workout happened (not when it was logged)
    pub date: DateTime<Utc>,
}

// ============================================================================
// Health metrics
// ============================================================================

/// Blood pressure reading in mmHg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    pub systolic: i32,
    pub diastolic: i32,
}

/// A daily health metric entry. Every measurement except steps is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub steps: i64,
    pub sleep_hours: Option<f64>,
    pub water_intake_liters: Option<f64>,
    pub weight: Option<f64>,
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<BloodPressure>,
}

// ============================================================================
// Streaks and points
// ============================================================================

/// Per-user streak and points record.
///
/// Transitions live in [`crate::streak`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreakState {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_workout_date: Option<DateTime<Utc>>,
    pub streak_start_date: Option<DateTime<Utc>>,
    pub total_points: i64,
    pub level: i32,
}

// ============================================================================
// Goals
// ============================================================================

text_enum! {
    /// What a goal measures
    pub enum GoalType {
        WeightLoss => "weight_loss",
        WeightGain => "weight_gain",
        WorkoutFrequency => "workout_frequency",
        CaloriesBurned => "calories_burned",
        Steps => "steps",
        Custom => "custom",
    }
}

text_enum! {
    /// Goal status
    pub enum GoalStatus {
        Active => "active",
        Completed => "completed",
        Failed => "failed",
        Abandoned => "abandoned",
    }
}

impl Default for GoalStatus {
    fn default() -> Self {
        GoalStatus::Active
    }
}

text_enum! {
    /// Goal priority
    pub enum GoalPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for GoalPriority {
    fn default() -> Self {
        GoalPriority::Medium
    }
}

/// Standard milestone percentages
pub const MILESTONE_PERCENTAGES: [i32; 4] = [25, 50, 75, 100];

/// Fractional checkpoint of a goal's target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub percentage: i32,
    pub value: f64,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

impl Milestone {
    /// Build the four standard milestones for a target value.
    ///
    /// Values are fixed here and never recomputed if the target changes later.
    pub fn standard_set(target_value: f64) -> Vec<Milestone> {
        MILESTONE_PERCENTAGES
            .iter()
            .map(|&percentage| Milestone {
                percentage,
                value: target_value * f64::from(percentage) / 100.0,
                achieved: false,
                achieved_at: None,
            })
            .collect()
    }
}

/// A user goal with its milestones
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub status: GoalStatus,
    pub priority: GoalPriority,
    pub milestones: Vec<Milestone>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    /// Progress towards the target as a percentage, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_value / self.target_value * 100.0).clamp(0.0, 100.0)
    }

    /// Completion timestamp after a status edit.
    ///
    /// Completing keeps an earlier stamp or takes `now`; any other status
    /// clears it; no status change leaves it as is.
    pub fn completed_at_after(
        &self,
        status: Option<GoalStatus>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match status {
            Some(GoalStatus::Completed) => self.completed_at.or(Some(now)),
            Some(_) => None,
            None => self.completed_at,
        }
    }
}

// ============================================================================
// Achievements
// ============================================================================

text_enum! {
    /// Achievement grouping shown in the UI
    pub enum AchievementCategory {
        Workout => "workout",
        Streak => "streak",
        Milestone => "milestone",
        Goal => "goal",
        Special => "special",
    }
}

text_enum! {
    /// Which aggregate an achievement compares against its threshold
    pub enum RequirementType {
        WorkoutCount => "workout_count",
        StreakDays => "streak_days",
        CaloriesBurned => "calories_burned",
        TotalDuration => "total_duration",
        CategorySpecific => "category_specific",
        GoalAchieved => "goal_achieved",
    }
}

text_enum! {
    /// Achievement rarity
    pub enum Rarity {
        Common => "common",
        Rare => "rare",
        Epic => "epic",
        Legendary => "legendary",
    }
}

/// Unlock rule of an achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub kind: RequirementType,
    pub value: i64,
    /// Only meaningful for `category_specific`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<WorkoutCategory>,
}

/// Catalog definition of an achievement, keyed by its unique name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementDefinition {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub points: i64,
    pub rarity: Rarity,
}

impl AchievementDefinition {
    pub fn into_achievement(self, id: Uuid) -> Achievement {
        Achievement {
            id,
            name: self.name,
            description: self.description,
            icon: self.icon,
            category: self.category,
            requirement: self.requirement,
            points: self.points,
            rarity: self.rarity,
        }
    }
}

/// A persisted catalog achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub points: i64,
    pub rarity: Rarity,
}

/// Progress of a user towards one achievement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementProgress {
    pub current: i64,
    pub target: i64,
}

/// Per-user state of one catalog achievement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAchievement {
    pub user_id: Uuid,
    pub achievement_id: Uuid,
    pub progress: AchievementProgress,
    pub is_unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Workout templates
// ============================================================================

text_enum! {
    /// Template difficulty
    pub enum Difficulty {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
}

impl Difficulty {
    /// Intensity a workout started from a template of this difficulty is logged with
    pub fn default_intensity(&self) -> Intensity {
        match self {
            Difficulty::Beginner => Intensity::Low,
            Difficulty::Intermediate => Intensity::Moderate,
            Difficulty::Advanced => Intensity::High,
        }
    }
}

/// One step of a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateExercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Catalog or user-authored template definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateDefinition {
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: WorkoutCategory,
    pub duration_minutes: i32,
    pub estimated_calories: i32,
    pub exercises: Vec<TemplateExercise>,
    pub tags: Vec<String>,
}

/// A persisted workout template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: WorkoutCategory,
    pub duration_minutes: i32,
    pub estimated_calories: i32,
    pub exercises: Vec<TemplateExercise>,
    pub is_public: bool,
    pub created_by: Option<Uuid>,
    pub usage_count: i64,
    pub tags: Vec<String>,
}
