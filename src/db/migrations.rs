//! Database migrations
//!
//! Schema creation and versioning.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: profiles and food log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- One row per user identity; targets are derived at save time
        -- ============================================
        CREATE TABLE profiles (
            user_id TEXT PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            age INTEGER NOT NULL DEFAULT 25,
            weight_kg REAL NOT NULL DEFAULT 70.0,
            height_cm REAL NOT NULL DEFAULT 175.0,
            gender TEXT NOT NULL DEFAULT 'Male',
            activity_level TEXT NOT NULL DEFAULT 'moderate'
                CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            fitness_goal TEXT NOT NULL DEFAULT 'maintain'
                CHECK(fitness_goal IN ('lose', 'maintain', 'gain')),

            -- Derived targets
            daily_calorie_target INTEGER NOT NULL,
            protein_target INTEGER NOT NULL,   -- grams
            carbs_target INTEGER NOT NULL,     -- grams
            fats_target INTEGER NOT NULL,      -- grams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD LOGS
        -- What a user ate, per day and meal
        -- ============================================
        CREATE TABLE food_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fats REAL NOT NULL DEFAULT 0,        -- grams
            serving_size TEXT NOT NULL DEFAULT '1 serving',
            date TEXT NOT NULL,                  -- ISO date: "2026-10-19"
            meal_type TEXT NOT NULL DEFAULT 'snack'
                CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            image_ref TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_logs_user_date ON food_logs(user_id, date);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version (0 for a database never migrated)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_fresh_database_needs_migration() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            assert_eq!(get_schema_version(conn)?, 0);
            assert!(needs_migration(conn)?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            run_migrations(conn)?;
            run_migrations(conn)?;
            assert_eq!(get_schema_version(conn)?, SCHEMA_VERSION);
            assert!(!needs_migration(conn)?);
            Ok(())
        })
        .unwrap();
    }
}
