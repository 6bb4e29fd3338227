//! Daily Stats MCP Tool
//!
//! Consumed totals for a day measured against the user's targets.

use serde::Serialize;

use crate::db::Database;
use crate::models::{FoodLogEntry, Macros, Profile};
use crate::nutrition::NutritionTargets;

use super::food_log::resolve_date;

/// Share of each target reached, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Response for get_daily_stats
#[derive(Debug, Serialize)]
pub struct DailyStats {
    pub user_id: String,
    pub date: String,
    pub meals_logged: i64,
    pub consumed: Macros,
    pub targets: NutritionTargets,
    /// false when the user has no profile and fallback targets are reported
    pub has_profile: bool,
    pub progress_percent: TargetProgress,
    /// Negative once the calorie target is exceeded
    pub calories_remaining: f64,
}

/// Percent of `target` reached; 0 for a non-positive target
fn percent_of(consumed: f64, target: i64) -> f64 {
    if target <= 0 {
        0.0
    } else {
        consumed * 100.0 / target as f64
    }
}

/// Compare consumed macros with targets
pub fn progress(consumed: &Macros, targets: &NutritionTargets) -> TargetProgress {
    TargetProgress {
        calories: percent_of(consumed.calories, targets.calories),
        protein: percent_of(consumed.protein, targets.protein_g),
        carbs: percent_of(consumed.carbs, targets.carbs_g),
        fats: percent_of(consumed.fats, targets.fats_g),
    }
}

/// Stats for one day (today when no date is given). Does not create a profile.
pub fn get_daily_stats(db: &Database, user_id: &str, date: Option<&str>) -> Result<DailyStats, String> {
    let user_id = user_id.trim();
    let date = resolve_date(date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (meals_logged, consumed) = FoodLogEntry::day_totals(&conn, user_id, &date)
        .map_err(|e| format!("Failed to total foods: {}", e))?;

    let profile = Profile::get(&conn, user_id)
        .map_err(|e| format!("Failed to load profile: {}", e))?;
    let has_profile = profile.is_some();
    let targets = profile.map(|p| p.targets).unwrap_or(NutritionTargets::FALLBACK);

    Ok(DailyStats {
        user_id: user_id.to_string(),
        date,
        meals_logged,
        consumed,
        targets,
        has_profile,
        progress_percent: progress(&consumed, &targets),
        calories_remaining: targets.calories as f64 - consumed.calories,
    })
}
