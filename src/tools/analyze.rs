//! Food Photo MCP Tool
//!
//! Estimates nutrition for a photo so the result can be reviewed and logged.

use serde::Serialize;

use crate::vision::{self, AnalyzedFood, FoodImage, VisionClient, VisionError};

/// Response for analyze_food_image
#[derive(Debug, Serialize)]
pub struct AnalyzeFoodImageResponse {
    #[serde(flatten)]
    pub food: AnalyzedFood,
    pub media_type: &'static str,
    pub image_bytes: usize,
    /// Nothing is logged automatically; pass these values to log_food to record them
    pub logged: bool,
}

/// Load the photo from exactly one of a path or base64 data
pub fn load_image(image_path: Option<&str>, image_base64: Option<&str>) -> Result<FoodImage, String> {
    let image = match (image_path, image_base64) {
        (Some(path), None) => FoodImage::from_path(path.trim()),
        (None, Some(data)) => FoodImage::from_base64(data),
        (Some(_), Some(_)) => return Err("Provide only one of image_path or image_base64".to_string()),
        (None, None) => return Err("Provide image_path or image_base64".to_string()),
    };
    image.map_err(|e| format!("Failed to load image: {}", e))
}

/// Run the photo through the vision model
pub async fn analyze_food_image(
    client: Option<&dyn VisionClient>,
    image_path: Option<&str>,
    image_base64: Option<&str>,
) -> Result<AnalyzeFoodImageResponse, String> {
    let client = client.ok_or_else(|| VisionError::MissingApiKey.to_string())?;
    let image = load_image(image_path, image_base64)?;

    let food = vision::analyze_food_image(client, &image).await.map_err(|e| {
        tracing::error!(error = %e, "food photo analysis failed");
        format!("Failed to analyze image: {}", e)
    })?;

    tracing::info!(food = %food.food_name, calories = food.calories, "food photo analyzed");

    Ok(AnalyzeFoodImageResponse {
        food,
        media_type: image.media_type(),
        image_bytes: image.len(),
        logged: false,
    })
}
