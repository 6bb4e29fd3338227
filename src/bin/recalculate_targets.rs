//! Recompute stored targets for every profile from its saved inputs
//! Usage: cargo run --bin recalculate_targets -- [--dry-run]

use nutritrack::config::database_path_from_env;
use nutritrack::db::{migrations, Database};
use nutritrack::models::Profile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dry_run = std::env::args().any(|a| a == "--dry-run");

    let db_path = database_path_from_env();
    println!("Database: {}", db_path.display());

    let database = Database::new(&db_path)?;

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let profiles = Profile::list_all(conn)?;
        println!("Found {} profiles", profiles.len());

        let mut changed = 0;
        for profile in &profiles {
            let fresh = profile.input().targets();
            if fresh == profile.targets {
                continue;
            }

            changed += 1;
            println!("\nProfile: {}", profile.user_id);
            println!(
                "  Old: {} kcal, P {}g, C {}g, F {}g",
                profile.targets.calories, profile.targets.protein_g, profile.targets.carbs_g, profile.targets.fats_g
            );
            println!(
                "  New: {} kcal, P {}g, C {}g, F {}g",
                fresh.calories, fresh.protein_g, fresh.carbs_g, fresh.fats_g
            );

            if !dry_run {
                Profile::store_targets(conn, &profile.user_id, &fresh)?;
            }
        }

        println!(
            "\n{} of {} profiles {}",
            changed,
            profiles.len(),
            if dry_run { "would change" } else { "updated" }
        );
        Ok(())
    })?;

    Ok(())
}
