//! NutriTrack MCP Server Implementation
//!
//! Exposes profile, food log, stats, and photo analysis tools over MCP.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{Macros, ProfileInput};
use crate::nutrition::{ActivityLevel, FitnessGoal};
use crate::tools::food_log::{self, LogFoodRequest};
use crate::tools::status::StatusTracker;
use crate::tools::{analyze, profile, stats};
use crate::vision::VisionClient;

/// NutriTrack MCP Service
#[derive(Clone)]
pub struct NutriTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    vision: Option<Arc<dyn VisionClient>>,
    tool_router: ToolRouter<NutriTrackService>,
}

impl NutriTrackService {
    pub fn new(database_path: PathBuf, database: Database, vision: Option<Arc<dyn VisionClient>>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, vision.is_some()))),
            database,
            vision,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProfileParams {
    /// User identity, e.g. "user-001"
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// User identity
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    /// Age in years (default 25)
    #[serde(default = "default_age")]
    pub age: i64,
    /// Body weight in kilograms, must be > 0
    pub weight_kg: f64,
    /// Height in centimeters (default 175)
    #[serde(default = "default_height")]
    pub height_cm: f64,
    /// "Male" or "Female" (default "Male")
    #[serde(default = "default_gender")]
    pub gender: String,
    /// sedentary, light, moderate, active, or very_active (unknown values count as moderate)
    #[serde(default)]
    pub activity_level: String,
    /// lose, maintain, or gain (unknown values count as maintain)
    #[serde(default)]
    pub fitness_goal: String,
}

fn default_age() -> i64 { 25 }
fn default_height() -> f64 { 175.0 }
fn default_gender() -> String { "Male".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewTargetsParams {
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// sedentary, light, moderate, active, or very_active
    #[serde(default)]
    pub activity_level: String,
    /// lose, maintain, or gain
    #[serde(default)]
    pub fitness_goal: String,
}

// ============================================================================
// Food Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub user_id: String,
    /// Food name
    pub name: String,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein in grams
    #[serde(default)]
    pub protein: f64,
    /// Carbohydrates in grams
    #[serde(default)]
    pub carbs: f64,
    /// Fats in grams
    #[serde(default)]
    pub fats: f64,
    /// Free text, default "1 serving"
    pub serving_size: Option<String>,
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
    /// breakfast, lunch, dinner, or snack (default snack)
    pub meal_type: Option<String>,
    /// Optional reference to the photo the values came from
    pub image_ref: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    pub user_id: String,
    /// Only this date (YYYY-MM-DD); omit for all dates
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodParams {
    /// Food log entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyStatsParams {
    pub user_id: String,
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFoodImageParams {
    /// Path to a JPEG, PNG, GIF, or WebP file readable by the server
    pub image_path: Option<String>,
    /// Base64 image data (a data: URL is also accepted)
    pub image_base64: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriTrack service including build info, database status, and process information")]
    async fn nutritrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for profiles, targets, and food logging. Call this when starting a tracking session.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get a user's profile and daily targets. Creates a default profile on first access.")]
    fn get_profile(&self, Parameters(p): Parameters<GetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Replace a user's profile (all fields). Calorie and macro targets are recalculated from weight, activity level, and fitness goal.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            name: p.name,
            age: p.age,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            gender: p.gender,
            activity_level: ActivityLevel::from_str(&p.activity_level),
            fitness_goal: FitnessGoal::from_str(&p.fitness_goal),
        };
        let result = profile::update_profile(&self.database, &p.user_id, input)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Preview the daily calorie and macro targets for a weight, activity level, and fitness goal without saving anything")]
    fn preview_targets(&self, Parameters(p): Parameters<PreviewTargetsParams>) -> Result<CallToolResult, McpError> {
        to_json(&profile::preview_targets(p.weight_kg, &p.activity_level, &p.fitness_goal))
    }

    // --- Food Log ---

    #[tool(description = "Log a food with calories and macros against a meal (breakfast, lunch, dinner, snack)")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let req = LogFoodRequest {
            user_id: p.user_id,
            name: p.name,
            macros: Macros { calories: p.calories, protein: p.protein, carbs: p.carbs, fats: p.fats },
            serving_size: p.serving_size,
            date: p.date,
            meal_type: p.meal_type,
            image_ref: p.image_ref,
        };
        let result = food_log::log_food(&self.database, req)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List a user's logged foods grouped by meal with subtotals, optionally for a single date")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::list_foods(&self.database, &p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a logged food by ID")]
    fn delete_food(&self, Parameters(p): Parameters<DeleteFoodParams>) -> Result<CallToolResult, McpError> {
        let result = food_log::delete_food(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Stats ---

    #[tool(description = "Get a day's totals (default today) compared with the user's calorie and macro targets")]
    fn get_daily_stats(&self, Parameters(p): Parameters<DailyStatsParams>) -> Result<CallToolResult, McpError> {
        let result = stats::get_daily_stats(&self.database, &p.user_id, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Photo Analysis ---

    #[tool(description = "Estimate food name, calories, and macros from a photo. Does not log anything; confirm with the user and call log_food.")]
    async fn analyze_food_image(&self, Parameters(p): Parameters<AnalyzeFoodImageParams>) -> Result<CallToolResult, McpError> {
        let result = analyze::analyze_food_image(
            self.vision.as_deref(),
            p.image_path.as_deref(),
            p.image_base64.as_deref(),
        )
        .await
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutriTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriTrack - Nutrition targets and food logging. \
                 Call tracking_instructions first. \
                 Profile: get_profile/update_profile/preview_targets. \
                 Food: log_food/list_foods/delete_food, analyze_food_image for photo estimates. \
                 Stats: get_daily_stats."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    fn service() -> NutriTrackService {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        NutriTrackService::new(PathBuf::from(":memory:"), db, None)
    }

    #[test]
    fn test_update_profile_params_defaults() {
        let p: UpdateProfileParams =
            serde_json::from_value(serde_json::json!({"user_id": "u1", "weight_kg": 70.0})).unwrap();
        assert_eq!(p.age, 25);
        assert_eq!(p.height_cm, 175.0);
        assert_eq!(p.gender, "Male");
        assert_eq!(ActivityLevel::from_str(&p.activity_level), ActivityLevel::Moderate);
    }

    #[test]
    fn test_server_info_names_service() {
        let info = service().get_info();
        assert_eq!(info.server_info.name, "nutritrack");
    }

    #[tokio::test]
    async fn test_analyze_without_vision_is_tool_error() {
        let svc = service();
        let params = AnalyzeFoodImageParams { image_path: None, image_base64: Some("R0lGODlh".into()) };
        assert!(svc.analyze_food_image(Parameters(params)).await.is_err());
    }
}
