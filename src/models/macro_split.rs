//! Macro split table
//!
//! Named percentage triples for protein / carbs / fats.

use serde::Serialize;

use super::MacroSplitKind;

/// Share of daily calories assigned to each macronutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub kind: MacroSplitKind,
    pub name: &'static str,
    pub description: &'static str,
    pub protein: f64, // percent
    pub carbs: f64,   // percent
    pub fats: f64,    // percent
}

const BALANCED: MacroSplit = MacroSplit {
    kind: MacroSplitKind::Balanced,
    name: "Balanced",
    description: "30% protein, 40% carbs, 30% fats",
    protein: 30.0,
    carbs: 40.0,
    fats: 30.0,
};

const HIGH_PROTEIN: MacroSplit = MacroSplit {
    kind: MacroSplitKind::HighProtein,
    name: "High Protein",
    description: "40% protein, 30% carbs, 30% fats",
    protein: 40.0,
    carbs: 30.0,
    fats: 30.0,
};

const LOW_CARB: MacroSplit = MacroSplit {
    kind: MacroSplitKind::LowCarb,
    name: "Low Carb",
    description: "35% protein, 20% carbs, 45% fats",
    protein: 35.0,
    carbs: 20.0,
    fats: 45.0,
};

const HIGH_CARB: MacroSplit = MacroSplit {
    kind: MacroSplitKind::HighCarb,
    name: "High Carb",
    description: "25% protein, 50% carbs, 25% fats",
    protein: 25.0,
    carbs: 50.0,
    fats: 25.0,
};

// Placeholder: users cannot edit these yet, so it carries the balanced numbers.
const CUSTOM: MacroSplit = MacroSplit {
    kind: MacroSplitKind::Custom,
    name: "Custom",
    description: "Set your own macro ratios",
    protein: 30.0,
    carbs: 40.0,
    fats: 30.0,
};

impl MacroSplit {
    /// Look up the fixed split for a key
    pub fn for_kind(kind: MacroSplitKind) -> &'static MacroSplit {
        match kind {
            MacroSplitKind::Balanced => &BALANCED,
            MacroSplitKind::HighProtein => &HIGH_PROTEIN,
            MacroSplitKind::LowCarb => &LOW_CARB,
            MacroSplitKind::HighCarb => &HIGH_CARB,
            MacroSplitKind::Custom => &CUSTOM,
        }
    }

    /// Every split in display order
    pub fn all() -> Vec<&'static MacroSplit> {
        MacroSplitKind::ALL.into_iter().map(Self::for_kind).collect()
    }

    /// Sum of the three percentages; not required to be 100
    pub fn total_percent(&self) -> f64 {
        self.protein + self.carbs + self.fats
    }
}
