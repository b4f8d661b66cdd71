//! MacroTrack Status Tool
//!
//! Provides runtime status information about the MacroTrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::{self, BUILD_TIMESTAMP, VERSION};

/// Food logging instructions for AI assistants
pub const LOGGING_INSTRUCTIONS: &str = r#"
# MacroTrack Logging Instructions

MacroTrack keeps a daily food log and compares it against calorie and
macronutrient targets derived from the user's body stats.

---

## 1. Set Up the Profile (once)

Call `get_targets` first. If no stats are set yet, ask the user for:

| Field | Values |
|-------|--------|
| age | years |
| gender | `male` or `female` |
| weight | kilograms |
| height | centimeters |
| activity_level | `sedentary`, `light`, `moderate`, `very`, `extreme` |
| goal | `cut` (-20%), `maintain`, `bulk` (+10%) |
| macro_split | `balanced`, `high-protein`, `low-carb`, `high-carb`, `custom` |

Then call `set_user_stats`. The response contains BMR, TDEE and the daily
targets. Use `list_macro_splits` to show the available ratios.

Typical ranges are age 18-100, weight 40-200 kg and height 140-220 cm.
Values outside them are saved but the response carries a warning.

---

## 2. Log Food

Entries are filed under the day of the moment they are logged, in the
server's configured UTC offset. There is no way to back-date an entry.

**Known product (preferred):**
1. `search_foods` by name or brand, or `lookup_barcode` with the code
   printed under the barcode (8, 12, 13 or 14 digits).
2. `log_product` with the product `id` or `barcode` and the amount in grams.
   Nutrition is scaled from the per-100 g values.

**Anything else:** `log_food` with name, quantity, unit, calories
(whole kcal) and protein/carbs/fats in grams.

If a product is missing from the catalog, add it with `add_food_product`
(values per 100 g) and then log it.

---

## 3. Review

- `get_today` - today's entries, totals, remaining and percent progress
- `get_day` - the same for any `YYYY-MM-DD` date
- `list_days` - recent days with totals, newest first
- `delete_food_entry` - remove an entry by date and id

`remaining` never goes below zero. Check `over_target` to tell the user
when a target has been exceeded.
"#;

/// Runtime status of the MacroTrack service
#[derive(Debug, Clone, Serialize)]
pub struct MacroTrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Storage and lookup
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub lookup_backend: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    lookup_backend: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, lookup_backend: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            lookup_backend: lookup_backend.into(),
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MacroTrackStatus {
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MacroTrackStatus {
            build_number: build_info::build_number(),
            build_timestamp: BUILD_TIMESTAMP,
            version: VERSION,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            lookup_backend: self.lookup_backend.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_process() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/macrotrack.db"), "local");
        let status = tracker.get_status();
        assert_eq!(status.process_id, std::process::id());
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.lookup_backend, "local");
    }
}
