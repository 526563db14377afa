//! Streak engine
//!
//! Maintains the consecutive-day workout streak and the points/level
//! progression stored on [`StreakState`].
//!
//! Day arithmetic is done on UTC calendar dates: two instants on the same
//! UTC date are the same day regardless of the server's local timezone.

use crate::errors::{ProgressError, ProgressResult};
use crate::models::StreakState;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Points needed per level
pub const POINTS_PER_LEVEL: i64 = 100;

/// Level for a points total: `floor(points / 100) + 1`
pub fn level_for_points(total_points: i64) -> i32 {
    let level = total_points.max(0) / POINTS_PER_LEVEL + 1;
    i32::try_from(level).unwrap_or(i32::MAX)
}

/// Whole UTC calendar days from `earlier` to `later` (negative if `later` is before)
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}

/// What a recorded workout did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakTransition {
    /// First workout ever on this record
    Started,
    /// Same calendar day as the last workout (or a clock earlier than it)
    Unchanged,
    /// Consecutive day
    Extended,
    /// One or more days were missed
    Reset,
}

impl StreakState {
    /// Fresh record as created by a read before any workout: (0, 0), level 1
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_workout_date: None,
            streak_start_date: None,
            total_points: 0,
            level: 1,
        }
    }

    /// Record created by the first recorded workout: (1, 1) starting `now`
    pub fn first_workout(user_id: Uuid, now: DateTime<Utc>) -> Self {
        let mut state = Self::new(user_id);
        state.record_workout(now);
        state
    }

    /// Apply a "workout recorded" event at `now`
    pub fn record_workout(&mut self, now: DateTime<Utc>) -> StreakTransition {
        let transition = match self.last_workout_date {
            None => {
                self.current_streak = 1;
                self.streak_start_date = Some(now);
                StreakTransition::Started
            }
            Some(last) => match days_between(last, now) {
                d if d <= 0 => return StreakTransition::Unchanged,
                1 => {
                    self.current_streak += 1;
                    StreakTransition::Extended
                }
                _ => {
                    self.current_streak = 1;
                    self.streak_start_date = Some(now);
                    StreakTransition::Reset
                }
            },
        };

        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.level = level_for_points(self.total_points);
        self.last_workout_date = Some(now);

        tracing::debug!(
            user_id = %self.user_id,
            ?transition,
            current = self.current_streak,
            longest = self.longest_streak,
            "Streak updated"
        );

        transition
    }
}

/// Apply a workout event to an optional record, creating it on first use
pub fn record_workout(
    state: Option<StreakState>,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> (StreakState, StreakTransition) {
    match state {
        Some(mut state) => {
            let transition = state.record_workout(now);
            (state, transition)
        }
        None => (StreakState::first_workout(user_id, now), StreakTransition::Started),
    }
}

/// Destination for achievement points.
///
/// The achievement engine awards through this interface instead of touching
/// streak storage itself.
pub trait PointsLedger {
    /// Add points, returning the new total
    fn award_points(&mut self, points: i64) -> ProgressResult<i64>;

    /// Current total (0 when there is no backing record)
    fn total_points(&self) -> i64;
}

impl PointsLedger for StreakState {
    fn award_points(&mut self, points: i64) -> ProgressResult<i64> {
        self.total_points = self.total_points.saturating_add(points.max(0));
        self.level = level_for_points(self.total_points);
        Ok(self.total_points)
    }

    fn total_points(&self) -> i64 {
        self.total_points
    }
}

impl<L: PointsLedger> PointsLedger for Option<L> {
    fn award_points(&mut self, points: i64) -> ProgressResult<i64> {
        match self {
            Some(ledger) => ledger.award_points(points),
            None => Err(ProgressError::MissingPrerequisite(
                "no streak record to credit points to".to_string(),
            )),
        }
    }

    fn total_points(&self) -> i64 {
        self.as_ref().map_or(0, |ledger| ledger.total_points())
    }
}
