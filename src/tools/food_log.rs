//! Food Log MCP Tools
//!
//! Logging, listing, and deleting eaten foods.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{FoodLogCreate, FoodLogEntry, Macros, MealType};

/// Today's date in local time, ISO formatted
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Resolve an optional date argument to a validated ISO date
pub fn resolve_date(date: Option<&str>) -> Result<String, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(today()),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(|parsed| parsed.format("%Y-%m-%d").to_string())
            .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", d)),
    }
}

/// Request to log a food
#[derive(Debug, Clone)]
pub struct LogFoodRequest {
    pub user_id: String,
    pub name: String,
    pub macros: Macros,
    pub serving_size: Option<String>,
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub image_ref: Option<String>,
}

/// Foods for one meal with their subtotal
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealType,
    pub entries: Vec<FoodLogEntry>,
    pub subtotal: Macros,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub user_id: String,
    pub date: Option<String>,
    /// Only meals that have entries, in breakfast/lunch/dinner/snack order
    pub meals: Vec<MealGroup>,
    pub total: Macros,
    pub count: usize,
}

/// Response for delete_food
#[derive(Debug, Serialize)]
pub struct DeleteFoodResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Log a food against a meal
pub fn log_food(db: &Database, req: LogFoodRequest) -> Result<FoodLogEntry, String> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err("user_id cannot be empty".to_string());
    }
    let name = req.name.trim();
    if name.is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if let Some(field) = req.macros.first_invalid_field() {
        return Err(format!("{} must be a non-negative number", field));
    }

    let serving_size = req
        .serving_size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("1 serving")
        .to_string();

    let data = FoodLogCreate {
        user_id: user_id.to_string(),
        name: name.to_string(),
        macros: req.macros,
        serving_size,
        date: resolve_date(req.date.as_deref())?,
        meal_type: req.meal_type.as_deref().map(MealType::from_str).unwrap_or_default(),
        image_ref: req.image_ref.filter(|r| !r.trim().is_empty()),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = FoodLogEntry::create(&conn, &data)
        .map_err(|e| format!("Failed to log food: {}", e))?;

    tracing::info!(
        user_id = %entry.user_id,
        id = entry.id,
        date = %entry.date,
        meal = entry.meal_type.as_str(),
        calories = entry.macros.calories,
        "food logged"
    );

    Ok(entry)
}

/// Group entries by meal with subtotals
pub fn group_by_meal(entries: Vec<FoodLogEntry>) -> Vec<MealGroup> {
    let mut groups: Vec<MealGroup> = MealType::ALL
        .iter()
        .map(|meal_type| MealGroup {
            meal_type: *meal_type,
            entries: Vec::new(),
            subtotal: Macros::zero(),
        })
        .collect();

    for entry in entries {
        if let Some(group) = groups.iter_mut().find(|g| g.meal_type == entry.meal_type) {
            group.subtotal = group.subtotal + entry.macros;
            group.entries.push(entry);
        }
    }

    groups.retain(|g| !g.entries.is_empty());
    groups
}

/// List a user's foods, optionally for one date, grouped by meal
pub fn list_foods(db: &Database, user_id: &str, date: Option<&str>) -> Result<ListFoodsResponse, String> {
    let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => Some(resolve_date(Some(d))?),
        None => None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = FoodLogEntry::list_for_user(&conn, user_id.trim(), date.as_deref())
        .map_err(|e| format!("Failed to list foods: {}", e))?;

    let count = entries.len();
    let total: Macros = entries.iter().map(|e| e.macros).sum();

    Ok(ListFoodsResponse {
        user_id: user_id.trim().to_string(),
        date,
        meals: group_by_meal(entries),
        total,
        count,
    })
}

/// Delete a logged food
pub fn delete_food(db: &Database, id: i64) -> Result<DeleteFoodResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = FoodLogEntry::delete(&conn, id)
        .map_err(|e| format!("Failed to delete food: {}", e))?;
    if !deleted {
        return Err(format!("Food not found with id: {}", id));
    }

    tracing::info!(id, "food deleted");
    Ok(DeleteFoodResponse {
        success: true,
        deleted_id: id,
    })
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

    fn request(name: &str, calories: f64, meal: &str, date: &str) -> LogFoodRequest {
        LogFoodRequest {
            user_id: "u1".to_string(),
            name: name.to_string(),
            macros: Macros { calories, protein: 10.0, carbs: 30.0, fats: 4.0 },
            serving_size: None,
            date: Some(date.to_string()),
            meal_type: Some(meal.to_string()),
            image_ref: None,
        }
    }

    #[test]
    fn test_resolve_date() {
        assert_eq!(resolve_date(Some("2026-10-19")).unwrap(), "2026-10-19");
        assert_eq!(resolve_date(None).unwrap(), today());
        assert_eq!(resolve_date(Some("  ")).unwrap(), today());
        assert!(resolve_date(Some("2026-13-40")).is_err());
        assert!(resolve_date(Some("yesterday")).is_err());
    }

    #[test]
    fn test_log_food_defaults() {
        let db = test_db();
        let req = LogFoodRequest {
            date: None,
            meal_type: None,
            ..request("Apple", 95.0, "", "")
        };
        let entry = log_food(&db, req).unwrap();
        assert_eq!(entry.serving_size, "1 serving");
        assert_eq!(entry.meal_type, MealType::Snack);
        assert_eq!(entry.date, today());
    }

    #[test]
    fn test_log_food_validation() {
        let db = test_db();
        assert!(log_food(&db, request("  ", 100.0, "lunch", "2026-10-19")).is_err());
        assert!(log_food(&db, request("Soup", -1.0, "lunch", "2026-10-19")).is_err());
        assert!(log_food(&db, request("Soup", 100.0, "lunch", "19/10/2026")).is_err());
        let no_user = LogFoodRequest { user_id: " ".to_string(), ..request("Soup", 100.0, "lunch", "2026-10-19") };
        assert!(log_food(&db, no_user).is_err());
    }

    #[test]
    fn test_list_groups_by_meal() {
        let db = test_db();
        log_food(&db, request("Eggs", 150.0, "breakfast", "2026-10-19")).unwrap();
        log_food(&db, request("Toast", 80.0, "breakfast", "2026-10-19")).unwrap();
        log_food(&db, request("Steak", 600.0, "dinner", "2026-10-19")).unwrap();
        log_food(&db, request("Pizza", 900.0, "dinner", "2026-10-18")).unwrap();

        let listed = list_foods(&db, "u1", Some("2026-10-19")).unwrap();
        assert_eq!(listed.count, 3);
        assert_eq!(listed.total.calories, 830.0);
        assert_eq!(listed.meals.len(), 2);
        assert_eq!(listed.meals[0].meal_type, MealType::Breakfast);
        assert_eq!(listed.meals[0].subtotal.calories, 230.0);
        assert_eq!(listed.meals[1].meal_type, MealType::Dinner);
        assert_eq!(listed.meals[1].entries.len(), 1);

        let everything = list_foods(&db, "u1", None).unwrap();
        assert_eq!(everything.count, 4);
        assert!(everything.date.is_none());
    }

    #[test]
    fn test_delete_food() {
        let db = test_db();
        let entry = log_food(&db, request("Eggs", 150.0, "breakfast", "2026-10-19")).unwrap();
        assert!(delete_food(&db, entry.id).unwrap().success);
        assert!(delete_food(&db, entry.id).is_err());
    }
}
