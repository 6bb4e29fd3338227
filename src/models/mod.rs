//! Data models
//!
//! Rust structs representing database entities.

mod food_log;
mod nutrition;
mod profile;

pub use food_log::{FoodLogCreate, FoodLogEntry, MealType, MAX_LIST_ROWS};
pub use nutrition::Macros;
pub use profile::{Profile, ProfileInput};
