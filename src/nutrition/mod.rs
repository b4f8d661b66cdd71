//! Nutrition calculation module
//!
//! Target derivation, daily aggregation and catalog scaling.

pub mod converter;
pub mod engine;
mod error;
pub mod rounding;

pub use converter::{product_to_entry, scale_factor, GRAM_UNIT};
pub use engine::{
    apply_goal, calculate_bmr, calculate_calorie_target, calculate_daily_totals,
    calculate_macro_progress, calculate_macro_targets, calculate_progress, calculate_remaining,
    calculate_tdee, macro_targets_for_calories, MacroProgress,
};
pub use error::{NutritionError, NutritionResult};
