//! Macro totals
//!
//! One shape for both derived targets and aggregated intake, so the two
//! compare field by field.

use serde::{Deserialize, Serialize};

use crate::nutrition::rounding::{from_micrograms, round1, to_micrograms};

/// Calories plus grams of each macronutrient
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: u32, // kcal
    pub protein: f64,  // grams
    pub carbs: f64,    // grams
    pub fats: f64,     // grams
}

/// Which fields of an intake exceed their target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverTarget {
    pub calories: bool,
    pub protein: bool,
    pub carbs: bool,
    pub fats: bool,
}

impl OverTarget {
    pub fn any(&self) -> bool {
        self.calories || self.protein || self.carbs || self.fats
    }
}

impl MacroTargets {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Gram fields rounded to one decimal
    pub fn rounded(&self) -> Self {
        MacroTargets {
            calories: self.calories,
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fats: round1(self.fats),
        }
    }

    /// Flag the fields where `self` (consumed) is above `target`, compared
    /// at the one-decimal precision both are reported in
    pub fn over_target(&self, target: &MacroTargets) -> OverTarget {
        let (used, target) = (self.rounded(), target.rounded());
        OverTarget {
            calories: used.calories > target.calories,
            protein: used.protein > target.protein,
            carbs: used.carbs > target.carbs,
            fats: used.fats > target.fats,
        }
    }
}

impl std::ops::Add for MacroTargets {
    type Output = MacroTargets;

    /// Gram fields are added as micrograms, which keeps addition associative
    fn add(self, other: MacroTargets) -> MacroTargets {
        let grams = |a: f64, b: f64| from_micrograms(to_micrograms(a) + to_micrograms(b));
        MacroTargets {
            calories: self.calories.saturating_add(other.calories),
            protein: grams(self.protein, other.protein),
            carbs: grams(self.carbs, other.carbs),
            fats: grams(self.fats, other.fats),
        }
    }
}

impl std::iter::Sum for MacroTargets {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MacroTargets::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(calories: u32, protein: f64, carbs: f64, fats: f64) -> MacroTargets {
        MacroTargets { calories, protein, carbs, fats }
    }

    #[test]
    fn test_add_is_exact() {
        let total = m(0, 0.1, 0.1, 0.1) + m(0, 0.2, 0.2, 0.2);
        assert_eq!(total.protein, 0.3);
    }

    #[test]
    fn test_add_keeps_sub_tenth_amounts() {
        let total: MacroTargets = std::iter::repeat(m(0, 0.04, 0.0, 0.06)).take(10).sum();
        assert!((total.protein - 0.4).abs() < 1e-9);
        assert!((total.fats - 0.6).abs() < 1e-9);
        assert_eq!(total.rounded(), m(0, 0.4, 0.0, 0.6));
    }

    #[test]
    fn test_sum_order_independent() {
        let items = [m(100, 0.1, 10.7, 3.3), m(250, 12.2, 0.3, 0.7), m(5, 0.7, 1.1, 9.9)];
        let forward: MacroTargets = items.iter().copied().sum();
        let backward: MacroTargets = items.iter().rev().copied().sum();
        let grouped = items[0] + (items[1] + items[2]);
        assert_eq!(forward, backward);
        assert_eq!(forward, grouped);
        assert_eq!(forward.calories, 355);
    }

    #[test]
    fn test_over_target() {
        let target = m(2000, 150.0, 200.0, 67.0);
        let consumed = m(2100, 150.0, 80.0, 67.04);
        let over = consumed.over_target(&target);
        assert!(over.calories);
        assert!(!over.protein);
        assert!(!over.carbs);
        assert!(!over.fats);
        assert!(over.any());
        assert!(!m(0, 0.0, 0.0, 0.0).over_target(&target).any());
    }
}
