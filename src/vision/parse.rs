//! Parser for the line-oriented analysis reply

use super::AnalyzedFood;

/// Parse `Key: value` lines into an [`AnalyzedFood`].
///
/// Never fails: missing fields keep their defaults and unparseable numbers become 0.
pub fn parse_analysis(text: &str) -> AnalyzedFood {
    let mut food = AnalyzedFood::default();

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_matches(|c| c == '*' || c == '-').trim().to_lowercase();
        let value = value.trim().trim_matches('*').trim();

        match key.as_str() {
            "food" | "food name" => {
                if !value.is_empty() {
                    food.food_name = value.to_string();
                }
            }
            "calories" => food.calories = parse_amount(&key, value),
            "protein" => food.protein = parse_amount(&key, value),
            "carbs" | "carbohydrates" => food.carbs = parse_amount(&key, value),
            "fats" | "fat" => food.fats = parse_amount(&key, value),
            "description" => {
                if !value.is_empty() {
                    food.description = value.to_string();
                }
            }
            _ => {}
        }
    }

    food
}

/// Read a number like "350", "350 kcal", "12.5g", "~20 g"
fn parse_amount(key: &str, value: &str) -> f64 {
    let cleaned = value
        .trim_start_matches('~')
        .trim_end_matches("kcal")
        .trim_end_matches("grams")
        .trim_end_matches('g')
        .trim();

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n,
        _ => {
            tracing::warn!(field = key, value, "unparseable amount in vision reply, using 0");
            0.0
        }
    }
}
