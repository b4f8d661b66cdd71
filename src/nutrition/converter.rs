//! Catalog-to-log conversion
//!
//! Turns a per-100 g catalog product and a gram quantity into the data for
//! a log entry. This is the only point where catalog values enter the log.

use crate::models::{FoodEntryCreate, FoodProduct};
use super::rounding::{round1, round_kcal};
use super::{NutritionError, NutritionResult};

/// Unit recorded on entries created from catalog products
pub const GRAM_UNIT: &str = "g";

/// Multiplier applied to per-100 g values for `grams` of product
pub fn scale_factor(grams: f64) -> f64 {
    grams / 100.0
}

/// Scale a product to `grams`.
///
/// Calories round to whole kcal, macros to one decimal.
pub fn product_to_entry(product: &FoodProduct, grams: f64) -> NutritionResult<FoodEntryCreate> {
    if !grams.is_finite() || grams <= 0.0 {
        return Err(NutritionError::invalid("quantity", "grams must be greater than 0"));
    }

    let factor = scale_factor(grams);
    Ok(FoodEntryCreate {
        name: product.name.clone(),
        quantity: grams,
        unit: GRAM_UNIT.to_string(),
        calories: round_kcal(product.calories_per_100g * factor),
        protein: round1(product.protein_per_100g * factor),
        carbs: round1(product.carbs_per_100g * factor),
        fats: round1(product.fat_per_100g * factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodProduct {
        FoodProduct {
            id: None,
            name: "Greek Yogurt".to_string(),
            brand: Some("Fage".to_string()),
            barcode: Some("5201054017760".to_string()),
            calories_per_100g: calories,
            protein_per_100g: protein,
            carbs_per_100g: carbs,
            fat_per_100g: fat,
            category: None,
            store: None,
        }
    }

    #[test]
    fn test_scale_150g() {
        let entry = product_to_entry(&product(200.0, 10.0, 4.0, 2.0), 150.0).unwrap();
        assert_eq!(entry.calories, 300);
        assert_eq!(entry.protein, 15.0);
        assert_eq!(entry.carbs, 6.0);
        assert_eq!(entry.fats, 3.0);
        assert_eq!(entry.quantity, 150.0);
        assert_eq!(entry.unit, "g");
        assert_eq!(entry.name, "Greek Yogurt");
    }

    #[test]
    fn test_one_decimal_boundary() {
        // 33.33 g protein per 100 g at 100 g -> 33.3
        let entry = product_to_entry(&product(97.0, 33.33, 0.05, 12.25), 100.0).unwrap();
        assert_eq!(entry.protein, 33.3);
        assert_eq!(entry.carbs, 0.1);
        assert_eq!(entry.fats, 12.3);
        assert_eq!(entry.calories, 97);
    }

    #[test]
    fn test_calories_round_to_nearest() {
        let entry = product_to_entry(&product(55.0, 0.0, 0.0, 0.0), 33.0).unwrap();
        // 18.15 kcal
        assert_eq!(entry.calories, 18);
    }

    #[test]
    fn test_rejects_non_positive_grams() {
        assert!(product_to_entry(&product(100.0, 1.0, 1.0, 1.0), 0.0).is_err());
        assert!(product_to_entry(&product(100.0, 1.0, 1.0, 1.0), -5.0).is_err());
    }
}
