//! Food Entry model
//!
//! One logged consumption event. Entries are immutable once stored;
//! they are only ever appended to a day or removed from it.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::nutrition::{NutritionError, NutritionResult};
use super::MacroTargets;

/// A logged food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: u32,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fats: f64,    // grams
    /// Local time of logging, offset included so the calendar day is
    /// recoverable from the entry alone
    pub timestamp: DateTime<FixedOffset>,
}

/// Data for logging a food (id and timestamp are assigned on insert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl FoodEntryCreate {
    pub fn validate(&self) -> NutritionResult<()> {
        if self.name.trim().is_empty() {
            return Err(NutritionError::invalid("name", "must not be empty"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(NutritionError::invalid("quantity", "must be greater than 0"));
        }
        for (field, value) in [("protein", self.protein), ("carbs", self.carbs), ("fats", self.fats)] {
            if !value.is_finite() || value < 0.0 {
                return Err(NutritionError::invalid(field, "must be a non-negative number of grams"));
            }
        }
        Ok(())
    }

    /// Stamp the data with an identity and logging time
    pub fn into_entry(self, id: Uuid, timestamp: DateTime<FixedOffset>) -> FoodEntry {
        FoodEntry {
            id,
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            timestamp,
        }
    }
}

impl FoodEntry {
    /// The entry's contribution to a daily total
    pub fn macros(&self) -> MacroTargets {
        MacroTargets {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> FoodEntryCreate {
        FoodEntryCreate {
            name: "  Oats ".to_string(),
            quantity: 80.0,
            unit: "g".to_string(),
            calories: 300,
            protein: 10.6,
            carbs: 54.0,
            fats: 5.3,
        }
    }

    #[test]
    fn test_validate() {
        assert!(create().validate().is_ok());

        let mut blank = create();
        blank.name = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut zero = create();
        zero.quantity = 0.0;
        assert!(zero.validate().is_err());

        let mut negative = create();
        negative.fats = -1.0;
        let err = negative.validate().unwrap_err();
        assert!(err.to_string().contains("fats"));
    }

    #[test]
    fn test_into_entry_trims_name() {
        let ts = DateTime::parse_from_rfc3339("2025-03-01T08:15:00+01:00").unwrap();
        let id = Uuid::new_v4();
        let entry = create().into_entry(id, ts);
        assert_eq!(entry.name, "Oats");
        assert_eq!(entry.id, id);
        assert_eq!(entry.timestamp, ts);
        assert_eq!(entry.macros().calories, 300);
    }

    #[test]
    fn test_json_round_trip() {
        let ts = DateTime::parse_from_rfc3339("2025-03-01T23:59:59.123456789-05:00").unwrap();
        let entry = create().into_entry(Uuid::new_v4(), ts);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("2025-03-01T23:59:59.123456789-05:00"));
        let back: FoodEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
