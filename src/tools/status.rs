//! NutriTrack Status Tool
//!
//! Runtime status information and the usage guide for AI assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Tracking instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# NutriTrack Instructions

## Identity

Every tool that stores data takes a `user_id`. Use the same id for the whole
conversation (for example `user-001`). Profiles are created with defaults the
first time `get_profile` is called for an id.

## Profile and Targets

Daily targets are derived, never entered:

| Step | Formula |
|------|---------|
| Base | weight_kg × 24 |
| Calories | round(base × activity multiplier), then lose −500 / gain +300 |
| Protein | round(weight_kg × 2.2) g |
| Fats | round(calories × 0.25 / 9) g |
| Carbs | round((calories − protein×4 − fats×9) / 4) g |

Activity multipliers: sedentary 1.2, light 1.375, moderate 1.55, active 1.725,
very_active 1.9. Unknown levels count as moderate, unknown goals as maintain.
Rounding is half up. Stored targets never go below 0.

- `preview_targets` shows what a save would store without saving
- `update_profile` replaces the whole profile; send every field

## Logging Food

1. Pick a meal: breakfast, lunch, dinner, or snack (default snack)
2. Call `log_food` with name, calories, protein, carbs, fats (grams)
3. `date` defaults to today (YYYY-MM-DD)

From a photo: call `analyze_food_image` with `image_path` or `image_base64`,
show the estimate to the user, then call `log_food` with the confirmed values.
Analysis never logs anything by itself.

## Reviewing

- `list_foods` groups a day's entries by meal with subtotals
- `get_daily_stats` compares the day's totals to the profile targets
- `delete_food` removes a mistaken entry by id
"#;

/// Runtime status of the NutriTrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutriTrackStatus {
    #[serde(flatten)]
    pub build: BuildInfo,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub vision_configured: bool,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    vision_configured: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, vision_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            vision_configured,
        }
    }

    pub fn get_status(&self) -> NutriTrackStatus {
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriTrackStatus {
            build: BuildInfo::current(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            vision_configured: self.vision_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
