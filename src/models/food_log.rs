//! Food log model
//!
//! One row per food a user ate, attached to a date and a meal.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::Macros;

/// Most rows returned by a single listing
pub const MAX_LIST_ROWS: i64 = 1000;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }
}

/// A logged food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    #[serde(flatten)]
    pub macros: Macros,
    pub serving_size: String,
    pub date: String,
    pub meal_type: MealType,
    pub image_ref: Option<String>,
    pub created_at: String,
}

/// Data for logging a food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogCreate {
    pub user_id: String,
    pub name: String,
    pub macros: Macros,
    pub serving_size: String,
    pub date: String,
    pub meal_type: MealType,
    pub image_ref: Option<String>,
}

impl FoodLogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            macros: Macros {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fats: row.get("fats")?,
            },
            serving_size: row.get("serving_size")?,
            date: row.get("date")?,
            meal_type: MealType::from_str(&meal_type),
            image_ref: row.get("image_ref")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &FoodLogCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_logs (
                user_id, name, calories, protein, carbs, fats,
                serving_size, date, meal_type, image_ref
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.user_id,
                data.name,
                data.macros.calories,
                data.macros.protein,
                data.macros.carbs,
                data.macros.fats,
                data.serving_size,
                data.date,
                data.meal_type.as_str(),
                data.image_ref,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| DbError::MissingAfterWrite(format!("food log {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's entries, newest first, optionally restricted to one date
    pub fn list_for_user(conn: &Connection, user_id: &str, date: Option<&str>) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM food_logs WHERE user_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(date) = date {
            params_vec.push(Box::new(date.to_string()));
            sql.push_str(&format!(" AND date = ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        params_vec.push(Box::new(MAX_LIST_ROWS));
        sql.push_str(&format!(" LIMIT ?{}", params_vec.len()));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Number of entries and summed macros for a user's day
    pub fn day_totals(conn: &Connection, user_id: &str, date: &str) -> DbResult<(i64, Macros)> {
        let totals = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(calories), 0.0),
                   COALESCE(SUM(protein), 0.0),
                   COALESCE(SUM(carbs), 0.0),
                   COALESCE(SUM(fats), 0.0)
            FROM food_logs
            WHERE user_id = ?1 AND date = ?2
            "#,
            params![user_id, date],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Macros {
                        calories: row.get(1)?,
                        protein: row.get(2)?,
                        carbs: row.get(3)?,
                        fats: row.get(4)?,
                    },
                ))
            },
        )?;
        Ok(totals)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_logs WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        db
    }

    fn entry(user: &str, name: &str, date: &str, meal: MealType, calories: f64) -> FoodLogCreate {
        FoodLogCreate {
            user_id: user.to_string(),
            name: name.to_string(),
            macros: Macros { calories, protein: 10.0, carbs: 20.0, fats: 5.0 },
            serving_size: "1 serving".to_string(),
            date: date.to_string(),
            meal_type: meal,
            image_ref: None,
        }
    }

    #[test]
    fn test_meal_type_fallback() {
        assert_eq!(MealType::from_str("Lunch"), MealType::Lunch);
        assert_eq!(MealType::from_str("brunch"), MealType::Snack);
        assert_eq!(MealType::from_str(""), MealType::Snack);
    }

    #[test]
    fn test_create_list_and_delete() {
        let db = test_db();
        db.with_conn(|conn| {
            let oats = FoodLogEntry::create(conn, &entry("u1", "Oats", "2026-10-18", MealType::Breakfast, 300.0))?;
            FoodLogEntry::create(conn, &entry("u1", "Rice", "2026-10-19", MealType::Dinner, 400.0))?;
            FoodLogEntry::create(conn, &entry("u2", "Apple", "2026-10-19", MealType::Snack, 95.0))?;

            assert_eq!(oats.macros.calories, 300.0);
            assert_eq!(oats.meal_type, MealType::Breakfast);

            let all = FoodLogEntry::list_for_user(conn, "u1", None)?;
            assert_eq!(all.len(), 2);
            assert_eq!(all[0].name, "Rice");

            let day = FoodLogEntry::list_for_user(conn, "u1", Some("2026-10-18"))?;
            assert_eq!(day.len(), 1);
            assert_eq!(day[0].id, oats.id);

            assert!(FoodLogEntry::delete(conn, oats.id)?);
            assert!(!FoodLogEntry::delete(conn, oats.id)?);
            assert!(FoodLogEntry::get_by_id(conn, oats.id)?.is_none());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_day_totals() {
        let db = test_db();
        db.with_conn(|conn| {
            let (count, totals) = FoodLogEntry::day_totals(conn, "u1", "2026-10-19")?;
            assert_eq!(count, 0);
            assert_eq!(totals, Macros::zero());

            FoodLogEntry::create(conn, &entry("u1", "Eggs", "2026-10-19", MealType::Breakfast, 150.0))?;
            FoodLogEntry::create(conn, &entry("u1", "Soup", "2026-10-19", MealType::Lunch, 220.5))?;
            FoodLogEntry::create(conn, &entry("u1", "Cake", "2026-10-20", MealType::Snack, 500.0))?;

            let (count, totals) = FoodLogEntry::day_totals(conn, "u1", "2026-10-19")?;
            assert_eq!(count, 2);
            assert_eq!(totals.calories, 370.5);
            assert_eq!(totals.protein, 20.0);
            assert_eq!(totals.carbs, 40.0);
            assert_eq!(totals.fats, 10.0);
            Ok(())
        })
        .unwrap();
    }
}
