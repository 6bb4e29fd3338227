//! Daily nutrition targets
//!
//! Maps body weight, activity level, and fitness goal to a daily calorie target and
//! macronutrient grams. This is the only place the formula lives: the live preview
//! and profile persistence both go through [`targets_for_profile`].

use serde::{Deserialize, Serialize};

/// Calories per kg of body weight used as the resting energy estimate
pub const BASE_KCAL_PER_KG: f64 = 24.0;

/// Protein grams per kg of body weight
pub const PROTEIN_G_PER_KG: f64 = 2.2;

/// Share of calories that come from fat
pub const FAT_CALORIE_SHARE: f64 = 0.25;

pub const KCAL_PER_G_PROTEIN: i64 = 4;
pub const KCAL_PER_G_CARBS: i64 = 4;
pub const KCAL_PER_G_FAT: i64 = 9;

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Total mapping: anything unrecognized (including "") is `Moderate`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" | "very active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    /// Total daily energy expenditure relative to resting expenditure
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// What the user wants their weight to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FitnessGoal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 3] = [FitnessGoal::Lose, FitnessGoal::Maintain, FitnessGoal::Gain];

    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::Lose => "lose",
            FitnessGoal::Maintain => "maintain",
            FitnessGoal::Gain => "gain",
        }
    }

    /// Total mapping: anything unrecognized is `Maintain`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lose" => FitnessGoal::Lose,
            "gain" => FitnessGoal::Gain,
            _ => FitnessGoal::Maintain,
        }
    }

    /// Fixed calorie shift applied after the activity adjustment
    pub fn calorie_offset(&self) -> i64 {
        match self {
            FitnessGoal::Lose => -500,
            FitnessGoal::Maintain => 0,
            FitnessGoal::Gain => 300,
        }
    }
}

/// Daily calorie and macronutrient targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fats_g: i64,
}

impl NutritionTargets {
    /// Targets reported for a user who has never saved a profile
    pub const FALLBACK: NutritionTargets = NutritionTargets {
        calories: 2000,
        protein_g: 150,
        carbs_g: 250,
        fats_g: 65,
    };

    /// Copy with every negative target raised to zero
    pub fn floored(&self) -> Self {
        Self {
            calories: self.calories.max(0),
            protein_g: self.protein_g.max(0),
            carbs_g: self.carbs_g.max(0),
            fats_g: self.fats_g.max(0),
        }
    }

    pub fn has_negative(&self) -> bool {
        self.calories < 0 || self.protein_g < 0 || self.carbs_g < 0 || self.fats_g < 0
    }
}

/// Round to nearest integer, ties toward positive infinity
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Compute raw targets. Total: never fails, never clamps, never overflows.
///
/// Arithmetic stays in f64 until the final conversion, which saturates at the i64
/// bounds. Degenerate input (non-positive weight, extreme `lose` cases) yields negative
/// values; see [`NutritionTargets::floored`].
pub fn calculate_targets(weight_kg: f64, activity: ActivityLevel, goal: FitnessGoal) -> NutritionTargets {
    let base = weight_kg * BASE_KCAL_PER_KG;
    let calories = round_half_up(base * activity.multiplier()) + goal.calorie_offset() as f64;

    let protein_g = round_half_up(weight_kg * PROTEIN_G_PER_KG);
    let fats_g = round_half_up(calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT as f64);

    let carb_kcal = calories - protein_g * KCAL_PER_G_PROTEIN as f64 - fats_g * KCAL_PER_G_FAT as f64;
    let carbs_g = round_half_up(carb_kcal / KCAL_PER_G_CARBS as f64);

    // `as` saturates out-of-range values and maps NaN to 0
    NutritionTargets {
        calories: calories as i64,
        protein_g: protein_g as i64,
        carbs_g: carbs_g as i64,
        fats_g: fats_g as i64,
    }
}

/// Targets as shown in previews and stored on profiles
pub fn targets_for_profile(weight_kg: f64, activity: ActivityLevel, goal: FitnessGoal) -> NutritionTargets {
    calculate_targets(weight_kg, activity, goal).floored()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderate_maintain_70kg() {
        let t = calculate_targets(70.0, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert_eq!(
            t,
            NutritionTargets { calories: 2604, protein_g: 154, carbs_g: 335, fats_g: 72 }
        );
    }

    #[test]
    fn test_sedentary_lose_60kg_rounds_half_up() {
        let t = calculate_targets(60.0, ActivityLevel::Sedentary, FitnessGoal::Lose);
        assert_eq!(t.calories, 1228);
        assert_eq!(t.protein_g, 132);
        assert_eq!(t.fats_g, 34);
        // (1228 - 528 - 306) / 4 = 98.5
        assert_eq!(t.carbs_g, 99);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(98.5), 99.0);
        assert_eq!(round_half_up(98.49), 98.0);
        assert_eq!(round_half_up(-29.5), -29.0);
        assert_eq!(round_half_up(-5.6), -6.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn test_round_half_up_just_below_half() {
        // 0.49999999999999994 + 0.5 rounds to 1.0 in f64; the rule must still give 0
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.5000000000000001), -1.0);
    }

    #[test]
    fn test_unknown_activity_falls_back_to_moderate() {
        assert_eq!(ActivityLevel::from_str(""), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_str("couch potato"), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_str("").multiplier(), 1.55);
        assert_eq!(ActivityLevel::from_str("VERY_ACTIVE"), ActivityLevel::VeryActive);

        let fallback = calculate_targets(70.0, ActivityLevel::from_str(""), FitnessGoal::Maintain);
        let moderate = calculate_targets(70.0, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert_eq!(fallback, moderate);
    }

    #[test]
    fn test_unknown_goal_falls_back_to_maintain() {
        assert_eq!(FitnessGoal::from_str("bulk"), FitnessGoal::Maintain);
        assert_eq!(FitnessGoal::from_str(" Gain "), FitnessGoal::Gain);
    }

    #[test]
    fn test_goal_offsets_against_maintain() {
        for activity in ActivityLevel::ALL {
            for weight in [45.0, 62.5, 70.0, 88.8, 120.0] {
                let maintain = calculate_targets(weight, activity, FitnessGoal::Maintain);
                let lose = calculate_targets(weight, activity, FitnessGoal::Lose);
                let gain = calculate_targets(weight, activity, FitnessGoal::Gain);
                assert_eq!(lose.calories, maintain.calories - 500);
                assert_eq!(gain.calories, maintain.calories + 300);
            }
        }
    }

    #[test]
    fn test_calories_strictly_increase_with_weight() {
        for activity in ActivityLevel::ALL {
            for goal in FitnessGoal::ALL {
                let mut prev = calculate_targets(40.0, activity, goal).calories;
                for w in 41..=150 {
                    let next = calculate_targets(w as f64, activity, goal).calories;
                    assert!(next > prev, "{:?}/{:?} not increasing at {}kg", activity, goal, w);
                    prev = next;
                }
            }
        }
    }

    #[test]
    fn test_calories_strictly_increase_with_activity() {
        for goal in FitnessGoal::ALL {
            for weight in [50.0, 70.0, 95.0] {
                let calories: Vec<i64> = ActivityLevel::ALL
                    .iter()
                    .map(|a| calculate_targets(weight, *a, goal).calories)
                    .collect();
                assert!(calories.windows(2).all(|w| w[1] > w[0]));
            }
        }
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let a = calculate_targets(81.3, ActivityLevel::Active, FitnessGoal::Gain);
        let b = calculate_targets(81.3, ActivityLevel::Active, FitnessGoal::Gain);
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_carbs_are_kept_raw_and_floored_for_profiles() {
        // 20kg sedentary lose: 576 - 500 = 76 kcal, protein 44g alone exceeds it
        let raw = calculate_targets(20.0, ActivityLevel::Sedentary, FitnessGoal::Lose);
        assert_eq!(raw.calories, 76);
        assert_eq!(raw.protein_g, 44);
        assert_eq!(raw.fats_g, 2);
        assert_eq!(raw.carbs_g, -29);
        assert!(raw.has_negative());

        let stored = targets_for_profile(20.0, ActivityLevel::Sedentary, FitnessGoal::Lose);
        assert_eq!(stored.carbs_g, 0);
        assert_eq!(stored.calories, 76);
        assert!(!stored.has_negative());
    }

    #[test]
    fn test_non_positive_weight_does_not_panic() {
        let zero = calculate_targets(0.0, ActivityLevel::Moderate, FitnessGoal::Maintain);
        assert_eq!(zero, NutritionTargets { calories: 0, protein_g: 0, carbs_g: 0, fats_g: 0 });

        let negative = calculate_targets(-10.0, ActivityLevel::Light, FitnessGoal::Lose);
        assert!(negative.calories < 0);
        assert_eq!(targets_for_profile(-10.0, ActivityLevel::Light, FitnessGoal::Lose).calories, 0);
    }

    #[test]
    fn test_huge_weights_saturate_instead_of_overflowing() {
        for weight in [1e19, 1e300] {
            for activity in ActivityLevel::ALL {
                for goal in FitnessGoal::ALL {
                    let t = calculate_targets(weight, activity, goal);
                    assert_eq!(t.calories, i64::MAX);
                    assert_eq!(t.protein_g, i64::MAX);
                    assert_eq!(t.carbs_g, i64::MAX);
                    assert!(t.fats_g > 0);
                    assert!(!targets_for_profile(weight, activity, goal).has_negative());
                }
            }
        }
    }

    #[test]
    fn test_infinite_weight_does_not_panic() {
        let t = calculate_targets(f64::INFINITY, ActivityLevel::Moderate, FitnessGoal::Lose);
        assert_eq!(t.calories, i64::MAX);
        // inf - inf is NaN, which converts to 0
        assert_eq!(t.carbs_g, 0);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ActivityLevel::VeryActive).unwrap(), "\"very_active\"");
        assert_eq!(serde_json::to_string(&FitnessGoal::Lose).unwrap(), "\"lose\"");
        for a in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_str(a.as_str()), a);
        }
    }
}
