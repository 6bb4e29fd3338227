//! Photo-based nutrition estimates
//!
//! Sends a food photo to a vision model and parses its structured reply.

mod client;
mod photo;
mod parse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::AnthropicVision;
pub use photo::FoodImage;
pub use parse::parse_analysis;

/// Vision pipeline errors
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision API key not configured (set ANTHROPIC_API_KEY)")]
    MissingApiKey,

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Unsupported image format (expected JPEG, PNG, GIF, or WebP)")]
    UnsupportedFormat,

    #[error("Vision API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Vision API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Vision API returned no text content")]
    EmptyResponse,
}

pub type VisionResult<T> = Result<T, VisionError>;

/// Estimated nutrition for a photographed food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedFood {
    pub food_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub description: String,
}

impl Default for AnalyzedFood {
    fn default() -> Self {
        Self {
            food_name: "Unknown food".to_string(),
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fats: 0.0,
            description: "Food analysis completed".to_string(),
        }
    }
}

pub const SYSTEM_PROMPT: &str =
    "You are a nutrition expert. Analyze food images and provide detailed nutritional information.";

pub const ANALYSIS_PROMPT: &str = "Analyze this food image and provide:
1. Food name
2. Estimated calories (kcal)
3. Estimated protein (grams)
4. Estimated carbohydrates (grams)
5. Estimated fats (grams)
6. Brief description

Respond in this exact format:
Food: [name]
Calories: [number]
Protein: [number]g
Carbs: [number]g
Fats: [number]g
Description: [brief description]";

/// A model that can describe a food photo in the [`ANALYSIS_PROMPT`] format
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn describe_food(&self, image: &FoodImage) -> VisionResult<String>;
}

/// Ask the model about the photo and parse its reply
pub async fn analyze_food_image(client: &dyn VisionClient, image: &FoodImage) -> VisionResult<AnalyzedFood> {
    let reply = client.describe_food(image).await?;
    tracing::debug!(chars = reply.len(), "vision reply received");
    Ok(parse_analysis(&reply))
}
