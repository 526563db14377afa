//! Fitness Tracker Shared Library
//!
//! Domain models, API types and the progress-and-unlock engines
//! (aggregates, streaks, goal progress, achievements, leaderboard).
//! Everything in here is pure: the backend loads records, hands them to
//! these functions and persists what comes back.

pub mod achievements;
pub mod aggregates;
pub mod catalog;
pub mod errors;
pub mod goal_progress;
pub mod leaderboard;
pub mod models;
pub mod streak;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use streak::PointsLedger;
