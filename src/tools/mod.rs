//! NutriTrack Tools module
//!
//! Tool implementations behind the MCP server. Each returns `Result<_, String>`
//! with a message fit to show the caller.

pub mod analyze;
pub mod food_log;
pub mod profile;
pub mod stats;
pub mod status;
