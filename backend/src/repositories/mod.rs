//! Database repositories
//!
//! PostgreSQL access via sqlx. Rows are read into `*Record` structs and
//! converted into the shared domain models before leaving this module.
//! Writes that take part in a larger transaction accept any `PgExecutor`.

pub mod achievements;
pub mod goals;
pub mod health_metrics;
pub mod streaks;
pub mod templates;
pub mod user;
pub mod workouts;

pub use achievements::{AchievementRepository, UserAchievementRepository};
pub use goals::{GoalRepository, NewGoal, UpdateGoal};
pub use health_metrics::{HealthMetricRepository, NewHealthMetric, UpdateHealthMetric};
pub use streaks::StreakRepository;
pub use templates::TemplateRepository;
pub use user::{NewUser, UserRecord, UserRepository};
pub use workouts::{NewWorkout, UpdateWorkout, WorkoutRepository};

use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// f64 into a NUMERIC column
pub(crate) fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64_retain(value).ok_or_else(|| anyhow!("{value} cannot be stored as a decimal"))
}

pub(crate) fn to_decimal_opt(value: Option<f64>) -> Result<Option<Decimal>> {
    value.map(to_decimal).transpose()
}

/// NUMERIC column into f64
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Text column into one of the shared enums
pub(crate) fn parse_column<T>(column: &str, raw: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse()
        .map_err(|e| anyhow!("unexpected {column} value in database: {e}"))
}
