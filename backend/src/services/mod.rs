//! Business logic services
//!
//! Services validate input, take the per-user lock for progress updates and
//! coordinate the repositories with the engines in the shared crate.

pub mod achievements;
pub mod catalog;
pub mod goals;
pub mod health_metrics;
pub mod streaks;
pub mod templates;
pub mod user;
pub mod workouts;

pub use achievements::AchievementService;
pub use catalog::ensure_catalog;
pub use goals::GoalService;
pub use health_metrics::HealthMetricService;
pub use streaks::StreakService;
pub use templates::TemplateService;
pub use user::UserService;
pub use workouts::WorkoutService;
