//! Runtime configuration
//!
//! Read once from the environment at startup.

use std::path::PathBuf;

pub const DEFAULT_VISION_MODEL: &str = "claude-3-5-haiku-latest";
pub const DEFAULT_VISION_BASE_URL: &str = "https://api.anthropic.com";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    /// Vision API key; photo analysis is unavailable without it
    pub vision_api_key: Option<String>,
    pub vision_model: String,
    pub vision_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path_from_env(),
            vision_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            vision_model: non_empty_var("NUTRITRACK_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            vision_base_url: non_empty_var("NUTRITRACK_VISION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VISION_BASE_URL.to_string()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get the database path from environment or use `<project>/data/nutritrack.db`
pub fn database_path_from_env() -> PathBuf {
    non_empty_var("NUTRITRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutritrack.db");
    path
}
