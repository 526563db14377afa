//! Built-in achievement and template catalogs
//!
//! Seeded idempotently at startup, keyed by name. Order here is the
//! display order of the catalog.

use crate::models::{
    AchievementCategory, AchievementDefinition, Difficulty, Rarity, Requirement, RequirementType,
    TemplateDefinition, TemplateExercise, WorkoutCategory,
};

fn achievement(
    name: &str,
    description: &str,
    icon: &str,
    category: AchievementCategory,
    requirement: Requirement,
    points: i64,
    rarity: Rarity,
) -> AchievementDefinition {
    AchievementDefinition {
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        requirement,
        points,
        rarity,
    }
}

fn needs(kind: RequirementType, value: i64) -> Requirement {
    Requirement {
        kind,
        value,
        category_type: None,
    }
}

fn needs_category(category: WorkoutCategory, value: i64) -> Requirement {
    Requirement {
        kind: RequirementType::CategorySpecific,
        value,
        category_type: Some(category),
    }
}

/// Default achievements in display order
pub fn default_achievements() -> Vec<AchievementDefinition> {
    use AchievementCategory::*;
    use RequirementType::*;

    vec![
        achievement(
            "First Step",
            "Complete your first workout",
            "🎯",
            Milestone,
            needs(WorkoutCount, 1),
            10,
            Rarity::Common,
        ),
        achievement(
            "Getting Started",
            "Complete 5 workouts",
            "🏃",
            Milestone,
            needs(WorkoutCount, 5),
            25,
            Rarity::Common,
        ),
        achievement(
            "Consistent Performer",
            "Complete 10 workouts",
            "💪",
            Milestone,
            needs(WorkoutCount, 10),
            50,
            Rarity::Rare,
        ),
        achievement(
            "Fitness Enthusiast",
            "Complete 25 workouts",
            "🔥",
            Milestone,
            needs(WorkoutCount, 25),
            100,
            Rarity::Rare,
        ),
        achievement(
            "Fitness Master",
            "Complete 50 workouts",
            "🏆",
            Milestone,
            needs(WorkoutCount, 50),
            200,
            Rarity::Epic,
        ),
        achievement(
            "Legend",
            "Complete 100 workouts",
            "👑",
            Milestone,
            needs(WorkoutCount, 100),
            500,
            Rarity::Legendary,
        ),
        achievement(
            "7-Day Warrior",
            "Maintain a 7-day workout streak",
            "⚡",
            Streak,
            needs(StreakDays, 7),
            75,
            Rarity::Rare,
        ),
        achievement(
            "30-Day Champion",
            "Maintain a 30-day workout streak",
            "🌟",
            Streak,
            needs(StreakDays, 30),
            300,
            Rarity::Epic,
        ),
        achievement(
            "Cardio King",
            "Complete 20 cardio workouts",
            "❤️",
            Workout,
            needs_category(WorkoutCategory::Cardio, 20),
            100,
            Rarity::Rare,
        ),
        achievement(
            "Strength Beast",
            "Complete 20 strength workouts",
            "💪",
            Workout,
            needs_category(WorkoutCategory::Strength, 20),
            100,
            Rarity::Rare,
        ),
        achievement(
            "Calorie Crusher",
            "Burn 5000 total calories",
            "🔥",
            Milestone,
            needs(CaloriesBurned, 5000),
            150,
            Rarity::Epic,
        ),
        // Counts all workouts; time of day is not tracked
        achievement(
            "Early Bird",
            "Complete 10 workouts before 7 AM",
            "🌅",
            Special,
            needs(WorkoutCount, 10),
            100,
            Rarity::Rare,
        ),
        achievement(
            "Goal Crusher",
            "Complete your first goal",
            "🎖️",
            Goal,
            needs(GoalAchieved, 1),
            50,
            Rarity::Rare,
        ),
    ]
}

fn timed(name: &str, seconds: i32, notes: &str) -> TemplateExercise {
    TemplateExercise {
        name: name.to_string(),
        sets: None,
        reps: None,
        duration: Some(seconds),
        notes: Some(notes.to_string()),
    }
}

fn sets(name: &str, sets: i32, reps: &str, notes: &str) -> TemplateExercise {
    TemplateExercise {
        name: name.to_string(),
        sets: Some(sets),
        reps: Some(reps.to_string()),
        duration: None,
        notes: Some(notes.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn template(
    name: &str,
    description: &str,
    difficulty: Difficulty,
    category: WorkoutCategory,
    duration_minutes: i32,
    estimated_calories: i32,
    exercises: Vec<TemplateExercise>,
    tags: &[&str],
) -> TemplateDefinition {
    TemplateDefinition {
        name: name.to_string(),
        description: description.to_string(),
        difficulty,
        category,
        duration_minutes,
        estimated_calories,
        exercises,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Default public workout templates
pub fn default_templates() -> Vec<TemplateDefinition> {
    vec![
        template(
            "7-Minute HIIT",
            "Quick high-intensity interval training for busy days",
            Difficulty::Beginner,
            WorkoutCategory::Cardio,
            7,
            80,
            ["Jumping Jacks", "Wall Sit", "Push-ups", "Crunches", "Step-ups", "Squats", "Plank"]
                .into_iter()
                .map(|name| timed(name, 30, "30 seconds work"))
                .collect(),
            &["quick", "hiit", "bodyweight", "no-equipment"],
        ),
        template(
            "Beginner Strength",
            "Perfect for those starting their strength training journey",
            Difficulty::Beginner,
            WorkoutCategory::Strength,
            30,
            150,
            vec![
                sets("Bodyweight Squats", 3, "10-12", "Focus on form"),
                sets("Push-ups", 3, "8-10", "Can do on knees"),
                sets("Lunges", 3, "10 each leg", "Alternate legs"),
                sets("Plank", 3, "30 seconds", "Keep core tight"),
                sets("Dumbbell Rows", 3, "10-12", "Use light weights"),
            ],
            &["beginner", "strength", "full-body"],
        ),
        template(
            "Morning Yoga Flow",
            "Gentle yoga routine to start your day energized",
            Difficulty::Beginner,
            WorkoutCategory::Flexibility,
            20,
            60,
            vec![
                timed("Cat-Cow Stretch", 60, "Warm up spine"),
                timed("Downward Dog", 60, "Hold and breathe"),
                timed("Warrior I", 30, "Each side"),
                timed("Tree Pose", 30, "Each side for balance"),
                timed("Child's Pose", 60, "Rest and relax"),
            ],
            &["yoga", "flexibility", "morning", "stress-relief"],
        ),
        template(
            "30-Min Cardio Blast",
            "Intensive cardio workout to burn maximum calories",
            Difficulty::Intermediate,
            WorkoutCategory::Cardio,
            30,
            300,
            vec![
                timed("Warm-up Jog", 300, "5 minutes"),
                timed("High Knees", 60, "Maximum intensity"),
                timed("Burpees", 60, "As many as possible"),
                timed("Mountain Climbers", 60, "Keep pace steady"),
                timed("Jump Rope", 120, "2 minutes"),
                timed("Cool-down Walk", 300, "5 minutes"),
            ],
            &["cardio", "fat-burn", "intermediate"],
        ),
        template(
            "Full Body Power",
            "Advanced strength workout targeting all major muscle groups",
            Difficulty::Advanced,
            WorkoutCategory::Strength,
            45,
            250,
            vec![
                sets("Barbell Squats", 4, "8-10", "Heavy weight"),
                sets("Bench Press", 4, "8-10", "Progressive overload"),
                sets("Deadlifts", 4, "6-8", "Perfect form crucial"),
                sets("Pull-ups", 3, "To failure", "Add weight if needed"),
                sets("Overhead Press", 3, "8-10", "Control the weight"),
            ],
            &["advanced", "strength", "muscle-building", "compound"],
        ),
    ]
}
