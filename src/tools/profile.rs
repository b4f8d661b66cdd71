//! Profile MCP Tools
//!
//! Tools for setting body stats and reading the derived targets.

use serde::Serialize;

use crate::models::{ActivityLevel, Gender, Goal, MacroSplit, MacroSplitKind, UserStats};
use crate::store::Store;
use crate::tracker::{TargetReport, Tracker};

/// Raw profile fields as they arrive from a tool call
#[derive(Debug, Clone)]
pub struct UserStatsInput {
    pub age: u32,
    pub gender: String,
    pub weight: f64,
    pub height: f64,
    pub activity_level: String,
    pub goal: String,
    pub macro_split: String,
}

impl UserStatsInput {
    /// Parse the enum fields. Unknown goals fall back to maintain.
    pub fn parse(&self) -> Result<UserStats, String> {
        Ok(UserStats {
            age: self.age,
            gender: self.gender.parse::<Gender>().map_err(|e| e.to_string())?,
            weight: self.weight,
            height: self.height,
            activity_level: self.activity_level.parse::<ActivityLevel>().map_err(|e| e.to_string())?,
            goal: Goal::from_str(&self.goal),
            macro_split: self.macro_split.parse::<MacroSplitKind>().map_err(|e| e.to_string())?,
        })
    }
}

/// Response for set_user_stats
#[derive(Debug, Serialize)]
pub struct SetUserStatsResponse {
    #[serde(flatten)]
    pub report: TargetReport,
    /// Set when a metric lies outside the usual entry ranges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Response for list_macro_splits
#[derive(Debug, Serialize)]
pub struct ListMacroSplitsResponse {
    pub splits: Vec<MacroSplit>,
}

/// Validate and save the profile, returning the new targets
pub fn set_user_stats<S: Store>(tracker: &Tracker<S>, input: &UserStatsInput) -> Result<SetUserStatsResponse, String> {
    let stats = input.parse()?;
    let report = tracker
        .set_user_stats(&stats)
        .map_err(|e| format!("Failed to save user stats: {}", e))?;

    let warning = (!stats.within_form_limits()).then(|| {
        "Stats are outside the usual ranges (age 18-100, weight 40-200 kg, height 140-220 cm); \
         targets may be unreliable"
            .to_string()
    });

    Ok(SetUserStatsResponse { report, warning })
}

/// Targets for the saved profile, or `None` before stats are set
pub fn get_targets<S: Store>(tracker: &Tracker<S>) -> Result<Option<TargetReport>, String> {
    tracker
        .target_report()
        .map_err(|e| format!("Failed to load targets: {}", e))
}

pub fn list_macro_splits() -> ListMacroSplitsResponse {
    ListMacroSplitsResponse {
        splits: MacroSplit::all().into_iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input() -> UserStatsInput {
        UserStatsInput {
            age: 30,
            gender: "male".to_string(),
            weight: 80.0,
            height: 180.0,
            activity_level: "moderate".to_string(),
            goal: "maintain".to_string(),
            macro_split: "high-protein".to_string(),
        }
    }

    #[test]
    fn test_set_and_get_targets() {
        let tracker = Tracker::new(MemoryStore::new());
        assert!(get_targets(&tracker).unwrap().is_none());

        let response = set_user_stats(&tracker, &input()).unwrap();
        assert!(response.warning.is_none());
        assert_eq!(response.report.targets.calories, 2759);

        let saved = get_targets(&tracker).unwrap().unwrap();
        assert_eq!(saved.targets, response.report.targets);
        assert_eq!(saved.split.kind, MacroSplitKind::HighProtein);
    }

    #[test]
    fn test_unknown_enum_values() {
        let tracker = Tracker::new(MemoryStore::new());

        let mut bad = input();
        bad.gender = "other".to_string();
        assert!(set_user_stats(&tracker, &bad).unwrap_err().contains("gender"));

        let mut lenient = input();
        lenient.goal = "shred".to_string();
        let response = set_user_stats(&tracker, &lenient).unwrap();
        assert_eq!(response.report.stats.goal, Goal::Maintain);
    }

    #[test]
    fn test_out_of_range_warns() {
        let tracker = Tracker::new(MemoryStore::new());
        let mut young = input();
        young.age = 15;
        assert!(set_user_stats(&tracker, &young).unwrap().warning.is_some());
    }

    #[test]
    fn test_list_macro_splits() {
        let response = list_macro_splits();
        assert_eq!(response.splits.len(), 5);
        assert!(response.splits.iter().all(|s| (s.total_percent() - 100.0).abs() < 1e-9));
    }
}
