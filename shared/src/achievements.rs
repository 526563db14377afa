//! Achievement engine
//!
//! Evaluates every catalog achievement against a user's current aggregates,
//! refreshes per-user progress, unlocks what became reachable and credits
//! the achievement points through a [`PointsLedger`].
//!
//! Unlocking is one-way. Once a `UserAchievement` is unlocked it is never
//! touched again, so its progress stays frozen at the unlock value and its
//! points are awarded exactly once.

use crate::aggregates::WorkoutAggregates;
use crate::errors::ProgressError;
use crate::models::{
    Achievement, AchievementProgress, Requirement, RequirementType, UserAchievement,
};
use crate::streak::PointsLedger;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Everything a requirement can be measured against
#[derive(Debug, Clone, Default)]
pub struct AchievementInputs {
    pub aggregates: WorkoutAggregates,
    pub current_streak: i32,
    /// Goals the user has completed
    pub completed_goals: i64,
}

/// Measured value for one requirement
pub fn progress_for(requirement: &Requirement, inputs: &AchievementInputs) -> i64 {
    let aggregates = &inputs.aggregates;
    match requirement.kind {
        RequirementType::WorkoutCount => aggregates.workout_count,
        RequirementType::StreakDays => i64::from(inputs.current_streak),
        RequirementType::CaloriesBurned => aggregates.total_calories,
        RequirementType::TotalDuration => aggregates.total_duration,
        RequirementType::CategorySpecific => requirement
            .category_type
            .map_or(0, |category| aggregates.category_count(category)),
        RequirementType::GoalAchieved => inputs.completed_goals,
    }
}

/// Result of one evaluation pass
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Achievements unlocked in this pass, in catalog order
    pub newly_unlocked: Vec<Achievement>,
    /// Rows created or refreshed in this pass (already-unlocked rows excluded)
    pub progress: Vec<UserAchievement>,
    pub points_awarded: i64,
    /// Points that could not be credited because the ledger was missing
    pub points_skipped: i64,
    /// Ledger total after the pass
    pub total_points: i64,
}

/// Evaluate `catalog` for one user.
///
/// `existing` holds the user's current rows in any order. An unlocked
/// achievement whose points cannot be credited stays unlocked; the missing
/// points are reported in [`Evaluation::points_skipped`].
pub fn evaluate<L: PointsLedger>(
    user_id: Uuid,
    catalog: &[Achievement],
    existing: &[UserAchievement],
    inputs: &AchievementInputs,
    ledger: &mut L,
    now: DateTime<Utc>,
) -> Evaluation {
    let by_achievement: HashMap<Uuid, &UserAchievement> =
        existing.iter().map(|ua| (ua.achievement_id, ua)).collect();

    let mut evaluation = Evaluation::default();

    for achievement in catalog {
        let previous = by_achievement.get(&achievement.id);
        if previous.is_some_and(|ua| ua.is_unlocked) {
            continue;
        }

        let target = achievement.requirement.value;
        let current = progress_for(&achievement.requirement, inputs);
        let mut row = UserAchievement {
            user_id,
            achievement_id: achievement.id,
            progress: AchievementProgress { current, target },
            is_unlocked: false,
            unlocked_at: None,
        };

        if current >= target {
            row.is_unlocked = true;
            row.unlocked_at = Some(now);

            match ledger.award_points(achievement.points) {
                Ok(_) => evaluation.points_awarded += achievement.points,
                Err(ProgressError::MissingPrerequisite(reason)) => {
                    tracing::warn!(
                        %user_id,
                        achievement = %achievement.name,
                        points = achievement.points,
                        %reason,
                        "Achievement unlocked without crediting points"
                    );
                    evaluation.points_skipped += achievement.points;
                }
                Err(e) => {
                    tracing::warn!(
                        %user_id,
                        achievement = %achievement.name,
                        error = %e,
                        "Point award failed"
                    );
                    evaluation.points_skipped += achievement.points;
                }
            }

            tracing::info!(%user_id, achievement = %achievement.name, "Achievement unlocked");
            evaluation.newly_unlocked.push(achievement.clone());
        }

        evaluation.progress.push(row);
    }

    evaluation.total_points = ledger.total_points();
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::fixtures::{at, workout};
    use crate::catalog::default_achievements;
    use crate::models::{StreakState, WorkoutCategory};
    use proptest::prelude::*;
    use rstest::rstest;

    fn catalog() -> Vec<Achievement> {
        default_achievements()
            .into_iter()
            .map(|definition| definition.into_achievement(Uuid::new_v4()))
            .collect()
    }

    fn inputs_for(
        workout_count: usize,
        category: WorkoutCategory,
        calories: i32,
    ) -> AchievementInputs {
        let workouts: Vec<_> = (0..workout_count)
            .map(|i| workout(category, 30, calories, at(1 + (i % 28) as u32, 7)))
            .collect();
        AchievementInputs {
            aggregates: WorkoutAggregates::from_workouts(&workouts),
            current_streak: 0,
            completed_goals: 0,
        }
    }

    fn find<'a>(catalog: &'a [Achievement], name: &str) -> &'a Achievement {
        catalog.iter().find(|a| a.name == name).unwrap()
    }

    #[rstest]
    #[case(RequirementType::WorkoutCount, None, 4)]
    #[case(RequirementType::CaloriesBurned, None, 800)]
    #[case(RequirementType::TotalDuration, None, 120)]
    #[case(RequirementType::StreakDays, None, 3)]
    #[case(RequirementType::GoalAchieved, None, 2)]
    #[case(RequirementType::CategorySpecific, Some(WorkoutCategory::Cardio), 4)]
    #[case(RequirementType::CategorySpecific, Some(WorkoutCategory::Strength), 0)]
    #[case(RequirementType::CategorySpecific, None, 0)]
    fn test_progress_for_requirement(
        #[case] kind: RequirementType,
        #[case] category_type: Option<WorkoutCategory>,
        #[case] expected: i64,
    ) {
        let mut inputs = inputs_for(4, WorkoutCategory::Cardio, 200);
        inputs.current_streak = 3;
        inputs.completed_goals = 2;

        let requirement = Requirement {
            kind,
            value: 1,
            category_type,
        };
        assert_eq!(progress_for(&requirement, &inputs), expected);
    }

    #[test]
    fn test_first_workout_unlocks_first_step_only() {
        let catalog = catalog();
        let mut ledger = Some(StreakState::new(Uuid::nil()));

        let evaluation = evaluate(
            Uuid::nil(),
            &catalog,
            &[],
            &inputs_for(1, WorkoutCategory::Cardio, 100),
            &mut ledger,
            at(1, 9),
        );

        let names: Vec<_> = evaluation.newly_unlocked.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First Step"]);
        assert_eq!(evaluation.points_awarded, 10);
        assert_eq!(evaluation.total_points, 10);
        assert_eq!(evaluation.progress.len(), catalog.len());
    }

    #[test]
    fn test_getting_started_unlocks_once_and_freezes_progress() {
        let catalog = catalog();
        let getting_started = find(&catalog, "Getting Started").id;
        let mut ledger = Some(StreakState::new(Uuid::nil()));

        let first = evaluate(
            Uuid::nil(),
            &catalog,
            &[],
            &inputs_for(5, WorkoutCategory::Strength, 100),
            &mut ledger,
            at(5, 9),
        );
        assert!(first.newly_unlocked.iter().any(|a| a.id == getting_started));
        let points_after_first = ledger.total_points();

        let second = evaluate(
            Uuid::nil(),
            &catalog,
            &first.progress,
            &inputs_for(10, WorkoutCategory::Strength, 100),
            &mut ledger,
            at(10, 9),
        );

        assert!(!second.newly_unlocked.iter().any(|a| a.id == getting_started));
        assert!(!second.progress.iter().any(|ua| ua.achievement_id == getting_started));

        let frozen = first
            .progress
            .iter()
            .find(|ua| ua.achievement_id == getting_started)
            .unwrap();
        assert_eq!(frozen.progress, AchievementProgress { current: 5, target: 5 });
        assert_eq!(frozen.unlocked_at, Some(at(5, 9)));

        // Only Consistent Performer and Early Bird are new at ten workouts
        assert_eq!(ledger.total_points(), points_after_first + 50 + 100);
    }

    #[test]
    fn test_category_achievement_counts_only_its_category() {
        let catalog = catalog();
        let mut ledger = Some(StreakState::new(Uuid::nil()));

        let evaluation = evaluate(
            Uuid::nil(),
            &catalog,
            &[],
            &inputs_for(20, WorkoutCategory::Cardio, 10),
            &mut ledger,
            at(20, 9),
        );

        assert!(evaluation.newly_unlocked.iter().any(|a| a.name == "Cardio King"));
        assert!(!evaluation.newly_unlocked.iter().any(|a| a.name == "Strength Beast"));
    }

    #[test]
    fn test_missing_ledger_still_unlocks_without_points() {
        let catalog = catalog();
        let mut ledger: Option<StreakState> = None;

        let evaluation = evaluate(
            Uuid::nil(),
            &catalog,
            &[],
            &inputs_for(1, WorkoutCategory::Other, 50),
            &mut ledger,
            at(1, 9),
        );

        assert_eq!(evaluation.newly_unlocked.len(), 1);
        assert_eq!(evaluation.points_awarded, 0);
        assert_eq!(evaluation.points_skipped, 10);
        assert_eq!(evaluation.total_points, 0);
    }

    #[test]
    fn test_goal_achievement_unlocks_from_completed_goals() {
        let catalog = catalog();
        let mut ledger = Some(StreakState::new(Uuid::nil()));
        let inputs = AchievementInputs {
            completed_goals: 1,
            ..AchievementInputs::default()
        };

        let evaluation = evaluate(Uuid::nil(), &catalog, &[], &inputs, &mut ledger, at(1, 9));

        let names: Vec<_> = evaluation.newly_unlocked.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Goal Crusher"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// A second pass over unchanged data unlocks nothing and awards nothing
        #[test]
        fn prop_evaluation_is_idempotent(
            workouts in 0usize..120,
            streak in 0i32..40,
            calories in 0i32..400,
        ) {
            let catalog = catalog();
            let mut ledger = Some(StreakState::new(Uuid::nil()));
            let mut inputs = inputs_for(workouts, WorkoutCategory::Cardio, calories);
            inputs.current_streak = streak;

            let first = evaluate(Uuid::nil(), &catalog, &[], &inputs, &mut ledger, at(1, 9));
            let points = ledger.total_points();

            let second =
                evaluate(Uuid::nil(), &catalog, &first.progress, &inputs, &mut ledger, at(2, 9));

            prop_assert!(second.newly_unlocked.is_empty());
            prop_assert_eq!(second.points_awarded, 0);
            prop_assert_eq!(ledger.total_points(), points);
        }
    }
}
