//! Nutrition calculation module
//!
//! Daily calorie and macronutrient targets.

pub mod targets;

pub use targets::{
    calculate_targets, round_half_up, targets_for_profile, ActivityLevel, FitnessGoal,
    NutritionTargets,
};
