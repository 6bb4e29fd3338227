//! Profile model
//!
//! One profile per user identity. Targets are derived from weight, activity level,
//! and fitness goal every time the profile is written; they are never set directly.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{targets_for_profile, ActivityLevel, FitnessGoal, NutritionTargets};

/// A stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub age: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
    pub targets: NutritionTargets,
    pub created_at: String,
    pub updated_at: String,
}

/// User-editable profile fields. Saving always replaces all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub age: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: String,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
}

impl Default for ProfileInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 25,
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: "Male".to_string(),
            activity_level: ActivityLevel::Moderate,
            fitness_goal: FitnessGoal::Maintain,
        }
    }
}

impl ProfileInput {
    pub fn targets(&self) -> NutritionTargets {
        targets_for_profile(self.weight_kg, self.activity_level, self.fitness_goal)
    }
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let activity: String = row.get("activity_level")?;
        let goal: String = row.get("fitness_goal")?;
        Ok(Self {
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            gender: row.get("gender")?,
            activity_level: ActivityLevel::from_str(&activity),
            fitness_goal: FitnessGoal::from_str(&goal),
            targets: NutritionTargets {
                calories: row.get("daily_calorie_target")?,
                protein_g: row.get("protein_target")?,
                carbs_g: row.get("carbs_target")?,
                fats_g: row.get("fats_target")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The editable half of this profile
    pub fn input(&self) -> ProfileInput {
        ProfileInput {
            name: self.name.clone(),
            age: self.age,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            gender: self.gender.clone(),
            activity_level: self.activity_level,
            fitness_goal: self.fitness_goal,
        }
    }

    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        match stmt.query_row([user_id], Self::from_row) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the profile, creating one from defaults on first access.
    /// The flag is true when the profile was just created.
    pub fn get_or_create(conn: &Connection, user_id: &str) -> DbResult<(Self, bool)> {
        if let Some(profile) = Self::get(conn, user_id)? {
            return Ok((profile, false));
        }

        let input = ProfileInput::default();
        let targets = input.targets();
        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, name, age, weight_kg, height_cm, gender, activity_level, fitness_goal,
                daily_calorie_target, protein_target, carbs_target, fats_target
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(user_id) DO NOTHING
            "#,
            params![
                user_id,
                input.name,
                input.age,
                input.weight_kg,
                input.height_cm,
                input.gender,
                input.activity_level.as_str(),
                input.fitness_goal.as_str(),
                targets.calories,
                targets.protein_g,
                targets.carbs_g,
                targets.fats_g,
            ],
        )?;
        let created = conn.changes() > 0;

        let profile = Self::get(conn, user_id)?
            .ok_or_else(|| DbError::MissingAfterWrite(format!("profile {}", user_id)))?;
        Ok((profile, created))
    }

    /// Replace every editable field and recompute targets (upsert)
    pub fn replace(conn: &Connection, user_id: &str, input: &ProfileInput) -> DbResult<Self> {
        let targets = input.targets();
        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, name, age, weight_kg, height_cm, gender, activity_level, fitness_goal,
                daily_calorie_target, protein_target, carbs_target, fats_target
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                gender = excluded.gender,
                activity_level = excluded.activity_level,
                fitness_goal = excluded.fitness_goal,
                daily_calorie_target = excluded.daily_calorie_target,
                protein_target = excluded.protein_target,
                carbs_target = excluded.carbs_target,
                fats_target = excluded.fats_target,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                input.name,
                input.age,
                input.weight_kg,
                input.height_cm,
                input.gender,
                input.activity_level.as_str(),
                input.fitness_goal.as_str(),
                targets.calories,
                targets.protein_g,
                targets.carbs_g,
                targets.fats_g,
            ],
        )?;

        Self::get(conn, user_id)?
            .ok_or_else(|| DbError::MissingAfterWrite(format!("profile {}", user_id)))
    }

    /// All profiles, ordered by user id
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles ORDER BY user_id ASC")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Overwrite stored targets without touching the editable fields
    pub fn store_targets(conn: &Connection, user_id: &str, targets: &NutritionTargets) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE profiles SET
                daily_calorie_target = ?1,
                protein_target = ?2,
                carbs_target = ?3,
                fats_target = ?4,
                updated_at = datetime('now')
            WHERE user_id = ?5
            "#,
            params![targets.calories, targets.protein_g, targets.carbs_g, targets.fats_g, user_id],
        )?;
        Ok(rows > 0)
    }
}
