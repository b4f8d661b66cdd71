//! User statistics model
//!
//! The single body profile that calorie and macro targets are derived from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::nutrition::{NutritionError, NutritionResult};

/// Biological sex, selects the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = NutritionError;

    fn from_str(s: &str) -> NutritionResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(NutritionError::unknown_key("gender", s)),
        }
    }
}

/// Habitual activity level, maps to a TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Very,
    /// Very hard exercise or a physical job
    Extreme,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Very,
        ActivityLevel::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extreme => "extreme",
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = NutritionError;

    fn from_str(s: &str) -> NutritionResult<Self> {
        let key = s.trim().to_lowercase();
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == key)
            .ok_or_else(|| NutritionError::unknown_key("activity_level", s))
    }
}

/// Weight goal, adjusts the calorie target relative to TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Cut,
    #[default]
    Maintain,
    Bulk,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Cut => "cut",
            Goal::Maintain => "maintain",
            Goal::Bulk => "bulk",
        }
    }

    /// Parse a goal key. Unknown keys fall back to maintain.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "cut" => Goal::Cut,
            "bulk" => Goal::Bulk,
            "maintain" => Goal::Maintain,
            other => {
                tracing::warn!("Unknown goal '{}', using maintain", other);
                Goal::Maintain
            }
        }
    }

    /// Multiplier applied to TDEE: 20% deficit, 10% surplus, or none
    pub fn factor(&self) -> f64 {
        match self {
            Goal::Cut => 0.8,
            Goal::Maintain => 1.0,
            Goal::Bulk => 1.1,
        }
    }
}

/// Key into the macro split table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacroSplitKind {
    Balanced,
    HighProtein,
    LowCarb,
    HighCarb,
    Custom,
}

impl MacroSplitKind {
    pub const ALL: [MacroSplitKind; 5] = [
        MacroSplitKind::Balanced,
        MacroSplitKind::HighProtein,
        MacroSplitKind::LowCarb,
        MacroSplitKind::HighCarb,
        MacroSplitKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroSplitKind::Balanced => "balanced",
            MacroSplitKind::HighProtein => "high-protein",
            MacroSplitKind::LowCarb => "low-carb",
            MacroSplitKind::HighCarb => "high-carb",
            MacroSplitKind::Custom => "custom",
        }
    }
}

impl FromStr for MacroSplitKind {
    type Err = NutritionError;

    fn from_str(s: &str) -> NutritionResult<Self> {
        let key = s.trim().to_lowercase();
        MacroSplitKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| NutritionError::unknown_key("macro_split", s))
    }
}

impl fmt::Display for MacroSplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body metrics and goal for the active user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub age: u32,
    pub gender: Gender,
    pub weight: f64,  // kg
    pub height: f64,  // cm
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub macro_split: MacroSplitKind,
}

/// Input ranges accepted by the stats form
pub const AGE_RANGE: (u32, u32) = (18, 100);
pub const WEIGHT_RANGE_KG: (f64, f64) = (40.0, 200.0);
pub const HEIGHT_RANGE_CM: (f64, f64) = (140.0, 220.0);

impl UserStats {
    /// Check the body metrics the formulas rely on
    pub fn validate(&self) -> NutritionResult<()> {
        if self.age == 0 {
            return Err(NutritionError::invalid("age", "must be greater than 0"));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(NutritionError::invalid("weight", "must be a positive number of kilograms"));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(NutritionError::invalid("height", "must be a positive number of centimeters"));
        }
        Ok(())
    }

    /// Whether the metrics sit inside the ranges the entry form allows.
    ///
    /// Advisory only; the engine accepts any positive values.
    pub fn within_form_limits(&self) -> bool {
        (AGE_RANGE.0..=AGE_RANGE.1).contains(&self.age)
            && (WEIGHT_RANGE_KG.0..=WEIGHT_RANGE_KG.1).contains(&self.weight)
            && (HEIGHT_RANGE_CM.0..=HEIGHT_RANGE_CM.1).contains(&self.height)
    }
}
