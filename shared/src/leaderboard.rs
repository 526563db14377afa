//! Leaderboard ranking over streak records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

/// A streak record joined with its owner's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: Uuid,
    pub name: String,
    pub total_points: i64,
    pub level: i32,
    pub current_streak: i32,
    pub longest_streak: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based
    pub rank: usize,
    #[serde(flatten)]
    pub row: LeaderboardRow,
}

/// Leaderboard order: points, then longest streak, then user id
pub fn compare(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.longest_streak.cmp(&a.longest_streak))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort, truncate to `limit` and number the rows
pub fn rank(mut rows: Vec<LeaderboardRow>, limit: usize) -> Vec<LeaderboardEntry> {
    rows.sort_by(compare);
    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, row)| LeaderboardEntry { rank: i + 1, row })
        .collect()
}
