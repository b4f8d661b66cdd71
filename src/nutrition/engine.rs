//! Nutrition engine
//!
//! Pure functions from a body profile to calorie and macro targets, and
//! from a day's entries to totals, remaining amounts and progress.

use serde::Serialize;

use crate::models::{FoodEntry, MacroSplit, MacroTargets, Goal, Gender, UserStats};
use super::rounding::{from_micrograms, round1, round_kcal, to_micrograms};
use super::NutritionResult;

/// kcal per gram of protein or carbohydrate
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Basal metabolic rate (Mifflin-St Jeor), kcal/day, unrounded
pub fn calculate_bmr(stats: &UserStats) -> NutritionResult<f64> {
    stats.validate()?;

    let base = 10.0 * stats.weight + 6.25 * stats.height - 5.0 * f64::from(stats.age);
    let bmr = match stats.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    };
    Ok(bmr)
}

/// Total daily energy expenditure: BMR scaled by activity
pub fn calculate_tdee(stats: &UserStats) -> NutritionResult<f64> {
    let bmr = calculate_bmr(stats)?;
    Ok(bmr * stats.activity_level.multiplier())
}

/// Daily calorie target for a given TDEE and goal
pub fn apply_goal(tdee: f64, goal: Goal) -> u32 {
    round_kcal(tdee * goal.factor())
}

/// Daily calorie target, rounded to whole kcal
pub fn calculate_calorie_target(stats: &UserStats) -> NutritionResult<u32> {
    let tdee = calculate_tdee(stats)?;
    let target = apply_goal(tdee, stats.goal);
    tracing::debug!(tdee, goal = stats.goal.as_str(), target, "calorie target");
    Ok(target)
}

/// Split a calorie budget into gram targets.
///
/// Each field is rounded to a whole gram on its own; the grams are not
/// adjusted to add back up to `calories`.
pub fn macro_targets_for_calories(calories: u32, split: &MacroSplit) -> MacroTargets {
    let kcal = f64::from(calories);
    let grams = |percent: f64, kcal_per_gram: f64| (kcal * percent / 100.0 / kcal_per_gram).round();

    MacroTargets {
        calories,
        protein: grams(split.protein, KCAL_PER_GRAM_PROTEIN),
        carbs: grams(split.carbs, KCAL_PER_GRAM_CARBS),
        fats: grams(split.fats, KCAL_PER_GRAM_FAT),
    }
}

/// Full target set for a profile
pub fn calculate_macro_targets(stats: &UserStats) -> NutritionResult<MacroTargets> {
    let calories = calculate_calorie_target(stats)?;
    let split = MacroSplit::for_kind(stats.macro_split);
    Ok(macro_targets_for_calories(calories, split))
}

/// Componentwise sum of a day's entries, gram fields rounded to one
/// decimal once summed. Empty input gives all zeros.
pub fn calculate_daily_totals<'a, I>(entries: I) -> MacroTargets
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    entries.into_iter().map(FoodEntry::macros).sum::<MacroTargets>().rounded()
}

/// What is left of each target, never below zero
pub fn calculate_remaining(targets: &MacroTargets, consumed: &MacroTargets) -> MacroTargets {
    let left = |target: f64, used: f64| {
        round1(from_micrograms((to_micrograms(target) - to_micrograms(used)).max(0)))
    };

    MacroTargets {
        calories: targets.calories.saturating_sub(consumed.calories),
        protein: left(targets.protein, consumed.protein),
        carbs: left(targets.carbs, consumed.carbs),
        fats: left(targets.fats, consumed.fats),
    }
}

/// Percentage of a target reached, 0..=100.
///
/// A target of zero (or less) has nothing to reach and reports 0.
pub fn calculate_progress(target: f64, consumed: f64) -> u8 {
    if !target.is_finite() || target <= 0.0 || !consumed.is_finite() {
        return 0;
    }
    let percent = (consumed / target * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Progress percentages for all four fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MacroProgress {
    pub calories: u8,
    pub protein: u8,
    pub carbs: u8,
    pub fats: u8,
}

pub fn calculate_macro_progress(targets: &MacroTargets, consumed: &MacroTargets) -> MacroProgress {
    MacroProgress {
        calories: calculate_progress(f64::from(targets.calories), f64::from(consumed.calories)),
        protein: calculate_progress(targets.protein, consumed.protein),
        carbs: calculate_progress(targets.carbs, consumed.carbs),
        fats: calculate_progress(targets.fats, consumed.fats),
    }
}
