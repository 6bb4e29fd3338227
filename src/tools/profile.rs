//! Profile MCP Tools
//!
//! Reading and saving profiles, plus a live preview of the targets a save would store.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileInput};
use crate::nutrition::{calculate_targets, targets_for_profile, ActivityLevel, FitnessGoal, NutritionTargets};

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct GetProfileResponse {
    pub profile: Profile,
    pub created: bool, // true if defaults were just stored
}

/// Response for preview_targets
#[derive(Debug, Serialize)]
pub struct PreviewTargetsResponse {
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub fitness_goal: FitnessGoal,
    /// What saving a profile with these inputs would store
    pub targets: NutritionTargets,
    /// Unclamped formula output; differs from `targets` only for degenerate inputs
    pub raw_targets: NutritionTargets,
    /// true when some raw target was negative and raised to 0
    pub floored: bool,
}

fn validate_user_id(user_id: &str) -> Result<&str, String> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err("user_id cannot be empty".to_string());
    }
    Ok(user_id)
}

fn validate_input(input: &ProfileInput) -> Result<(), String> {
    if !input.weight_kg.is_finite() || input.weight_kg <= 0.0 {
        return Err("weight_kg must be greater than 0".to_string());
    }
    if !input.height_cm.is_finite() || input.height_cm < 0.0 {
        return Err("height_cm cannot be negative".to_string());
    }
    if input.age < 0 {
        return Err("age cannot be negative".to_string());
    }
    Ok(())
}

/// Get a profile, creating it from defaults on first access
pub fn get_profile(db: &Database, user_id: &str) -> Result<GetProfileResponse, String> {
    let user_id = validate_user_id(user_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (profile, created) = Profile::get_or_create(&conn, user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?;

    if created {
        tracing::info!(user_id, "created default profile");
    }

    Ok(GetProfileResponse { profile, created })
}

/// Replace a profile wholesale; targets are recomputed from the new inputs
pub fn update_profile(db: &Database, user_id: &str, input: ProfileInput) -> Result<Profile, String> {
    let user_id = validate_user_id(user_id)?;
    validate_input(&input)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::replace(&conn, user_id, &input)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    tracing::info!(
        user_id,
        calories = profile.targets.calories,
        protein_g = profile.targets.protein_g,
        carbs_g = profile.targets.carbs_g,
        fats_g = profile.targets.fats_g,
        "profile saved"
    );

    Ok(profile)
}

/// Targets for unsaved inputs. Unknown levels and goals fall back like a save would.
pub fn preview_targets(weight_kg: f64, activity_level: &str, fitness_goal: &str) -> PreviewTargetsResponse {
    let activity = ActivityLevel::from_str(activity_level);
    let goal = FitnessGoal::from_str(fitness_goal);

    let raw_targets = calculate_targets(weight_kg, activity, goal);

    PreviewTargetsResponse {
        weight_kg,
        activity_level: activity,
        activity_multiplier: activity.multiplier(),
        fitness_goal: goal,
        targets: targets_for_profile(weight_kg, activity, goal),
        raw_targets,
        floored: raw_targets.has_negative(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_get_profile_creates_then_reuses() {
        let db = test_db();
        let first = get_profile(&db, " user-001 ").unwrap();
        assert!(first.created);
        assert_eq!(first.profile.user_id, "user-001");

        let second = get_profile(&db, "user-001").unwrap();
        assert!(!second.created);
        assert!(get_profile(&db, "   ").is_err());
    }

    #[test]
    fn test_update_profile_matches_preview() {
        let db = test_db();
        let input = ProfileInput {
            weight_kg: 82.0,
            activity_level: ActivityLevel::Active,
            fitness_goal: FitnessGoal::Gain,
            ..ProfileInput::default()
        };
        let saved = update_profile(&db, "u1", input).unwrap();
        let preview = preview_targets(82.0, "active", "gain");
        assert_eq!(saved.targets, preview.targets);
    }

    #[test]
    fn test_update_profile_rejects_bad_weight() {
        let db = test_db();
        for weight in [0.0, -5.0, f64::NAN] {
            let input = ProfileInput { weight_kg: weight, ..ProfileInput::default() };
            assert!(update_profile(&db, "u1", input).is_err());
        }
        let input = ProfileInput { age: -1, ..ProfileInput::default() };
        assert!(update_profile(&db, "u1", input).is_err());
    }

    #[test]
    fn test_preview_falls_back_on_unknown_values() {
        let preview = preview_targets(70.0, "", "whatever");
        assert_eq!(preview.activity_level, ActivityLevel::Moderate);
        assert_eq!(preview.activity_multiplier, 1.55);
        assert_eq!(preview.fitness_goal, FitnessGoal::Maintain);
        assert_eq!(preview.targets.calories, 2604);
    }

    #[test]
    fn test_preview_huge_weight_saturates() {
        for weight in [1e19, 1e300] {
            let preview = preview_targets(weight, "moderate", "gain");
            assert_eq!(preview.targets.calories, i64::MAX);
            assert!(!preview.floored);
        }
    }

    #[test]
    fn test_update_profile_accepts_huge_weight() {
        let db = test_db();
        let input = ProfileInput { weight_kg: 1e300, ..ProfileInput::default() };
        let saved = update_profile(&db, "u1", input).unwrap();
        assert_eq!(saved.targets.calories, i64::MAX);
    }

    #[test]
    fn test_preview_reports_raw_negative_carbs() {
        let preview = preview_targets(20.0, "sedentary", "lose");
        assert_eq!(preview.raw_targets.carbs_g, -29);
        assert_eq!(preview.targets.carbs_g, 0);
        assert!(preview.floored);
    }
}
