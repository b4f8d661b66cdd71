//! Data models
//!
//! Plain records shared by the engine, the store and the lookup layer.

mod food_entry;
mod food_product;
mod macro_split;
mod macros;
mod user_stats;

pub use food_entry::{FoodEntry, FoodEntryCreate};
pub use food_product::{FoodProduct, FoodProductCreate};
pub use macro_split::MacroSplit;
pub use macros::{MacroTargets, OverTarget};
pub use user_stats::{
    ActivityLevel, Gender, Goal, MacroSplitKind, UserStats,
    AGE_RANGE, HEIGHT_RANGE_CM, WEIGHT_RANGE_KG,
};
