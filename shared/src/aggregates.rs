//! Aggregate reader
//!
//! Derives scalar aggregates from a user's raw records. Nothing here is
//! cached: callers pass the full record set on every call.

use crate::models::{HealthMetric, Workout, WorkoutCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts and sums over a user's workouts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutAggregates {
    pub workout_count: i64,
    pub total_calories: i64,
    pub total_duration: i64,
    pub category_counts: BTreeMap<WorkoutCategory, i64>,
}

impl WorkoutAggregates {
    /// Aggregate a full workout set in one pass
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        workouts.iter().fold(Self::default(), |mut acc, workout| {
            acc.workout_count += 1;
            acc.total_calories += i64::from(workout.calories_burned);
            acc.total_duration += i64::from(workout.duration_minutes);
            *acc.category_counts.entry(workout.category).or_insert(0) += 1;
            acc
        })
    }

    /// Number of workouts in a category (0 when none were logged)
    pub fn category_count(&self, category: WorkoutCategory) -> i64 {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }
}

/// Workouts dated inside `[from, to]`, both ends inclusive
pub fn workouts_in_range<'a>(
    workouts: &'a [Workout],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> impl Iterator<Item = &'a Workout> {
    workouts
        .iter()
        .filter(move |w| w.date >= from && w.date <= to)
}

/// Sum of steps over metrics dated inside `[from, to]`
pub fn steps_sum(metrics: &[HealthMetric], from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    metrics
        .iter()
        .filter(|m| m.date >= from && m.date <= to)
        .map(|m| m.steps)
        .sum()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::Intensity;
    use chrono::TimeZone;
    use uuid::Uuid;

    pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    pub fn workout(
        category: WorkoutCategory,
        minutes: i32,
        calories: i32,
        date: DateTime<Utc>,
    ) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            exercise_name: "Session".to_string(),
            category,
            duration_minutes: minutes,
            calories_burned: calories,
            intensity: Intensity::Moderate,
            notes: None,
            date,
        }
    }

    pub fn metric(date: DateTime<Utc>, steps: i64, weight: Option<f64>) -> HealthMetric {
        HealthMetric {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            steps,
            sleep_hours: None,
            water_intake_liters: None,
            weight,
            heart_rate: None,
            blood_pressure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_set_yields_zero_aggregates() {
        let aggregates = WorkoutAggregates::from_workouts(&[]);
        assert_eq!(aggregates, WorkoutAggregates::default());
        assert_eq!(aggregates.category_count(WorkoutCategory::Cardio), 0);
    }

    #[test]
    fn test_aggregates_sum_and_count() {
        let workouts = vec![
            workout(WorkoutCategory::Cardio, 30, 300, at(1, 8)),
            workout(WorkoutCategory::Strength, 45, 250, at(2, 8)),
            workout(WorkoutCategory::Cardio, 20, 180, at(3, 8)),
        ];

        let aggregates = WorkoutAggregates::from_workouts(&workouts);

        assert_eq!(aggregates.workout_count, 3);
        assert_eq!(aggregates.total_calories, 730);
        assert_eq!(aggregates.total_duration, 95);
        assert_eq!(aggregates.category_count(WorkoutCategory::Cardio), 2);
        assert_eq!(aggregates.category_count(WorkoutCategory::Strength), 1);
        assert_eq!(aggregates.category_count(WorkoutCategory::Sports), 0);
    }

    #[test]
    fn test_range_filters_are_inclusive() {
        let workouts = vec![
            workout(WorkoutCategory::Other, 10, 50, at(1, 0)),
            workout(WorkoutCategory::Other, 10, 50, at(5, 0)),
            workout(WorkoutCategory::Other, 10, 50, at(9, 0)),
        ];
        assert_eq!(workouts_in_range(&workouts, at(1, 0), at(5, 0)).count(), 2);

        let metrics = vec![
            metric(at(1, 0), 1000, None),
            metric(at(2, 0), 2500, None),
            metric(at(3, 0), 4000, None),
        ];
        assert_eq!(steps_sum(&metrics, at(2, 0), at(3, 0)), 6500);
        assert_eq!(steps_sum(&metrics, at(4, 0), at(5, 0)), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Category counts always add up to the workout count
        #[test]
        fn prop_category_counts_partition_workouts(
            entries in prop::collection::vec((0usize..5, 1i32..180, 0i32..1500), 0..60)
        ) {
            let workouts: Vec<Workout> = entries
                .iter()
                .map(|&(c, minutes, calories)| {
                    workout(WorkoutCategory::ALL[c], minutes, calories, at(1, 0))
                })
                .collect();

            let aggregates = WorkoutAggregates::from_workouts(&workouts);
            let by_category: i64 = WorkoutCategory::ALL
                .iter()
                .map(|c| aggregates.category_count(*c))
                .sum();

            prop_assert_eq!(by_category, aggregates.workout_count);
            prop_assert_eq!(aggregates.workout_count, workouts.len() as i64);
        }
    }
}
