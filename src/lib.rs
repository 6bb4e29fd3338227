//! NutriTrack Library
//!
//! Nutrition targets, food logging, and daily stats behind an MCP server.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
pub mod vision;
