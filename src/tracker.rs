//! Daily food log
//!
//! Binds the nutrition engine to a `Store`: logging and removing entries,
//! per-day summaries against the profile's targets, and history.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{FoodEntry, FoodEntryCreate, FoodProduct, MacroSplit, MacroTargets, OverTarget, UserStats};
use crate::nutrition::{
    calculate_bmr, calculate_daily_totals, calculate_macro_progress, calculate_remaining,
    calculate_tdee, apply_goal, macro_targets_for_calories, product_to_entry, MacroProgress,
    NutritionError, NutritionResult,
};
use crate::store::{DayKey, Store, StoreError, DEFAULT_PROFILE};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Invalid(#[from] NutritionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Everything derived from a profile
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub stats: UserStats,
    pub bmr: f64,
    pub tdee: f64,
    pub targets: MacroTargets,
    pub split: MacroSplit,
}

/// Derive BMR, TDEE and targets in one pass
pub fn target_report(stats: &UserStats) -> NutritionResult<TargetReport> {
    let bmr = calculate_bmr(stats)?;
    let tdee = calculate_tdee(stats)?;
    let split = *MacroSplit::for_kind(stats.macro_split);
    let targets = macro_targets_for_calories(apply_goal(tdee, stats.goal), &split);

    Ok(TargetReport {
        stats: stats.clone(),
        bmr,
        tdee,
        targets,
        split,
    })
}

/// A day's entries with totals and, when targets are known, remaining and progress
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub day: DayKey,
    pub entries: Vec<FoodEntry>,
    pub totals: MacroTargets,
    pub targets: Option<MacroTargets>,
    pub remaining: Option<MacroTargets>,
    pub progress: Option<MacroProgress>,
    pub over_target: Option<OverTarget>,
}

pub fn summarize(day: DayKey, entries: Vec<FoodEntry>, targets: Option<MacroTargets>) -> DaySummary {
    let totals = calculate_daily_totals(&entries);

    DaySummary {
        day,
        totals,
        targets,
        remaining: targets.map(|t| calculate_remaining(&t, &totals)),
        progress: targets.map(|t| calculate_macro_progress(&t, &totals)),
        over_target: targets.map(|t| totals.over_target(&t)),
        entries,
    }
}

/// One line of history
#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
    pub day: DayKey,
    pub entry_count: usize,
    pub totals: MacroTargets,
}

/// Outcome of merging a flat entry list into the day partitions
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped_existing: usize,
    pub days_touched: Vec<DayKey>,
}

/// Group entries by the calendar day of their timestamp
pub fn partition_by_day<I>(entries: I) -> BTreeMap<DayKey, Vec<FoodEntry>>
where
    I: IntoIterator<Item = FoodEntry>,
{
    let mut days: BTreeMap<DayKey, Vec<FoodEntry>> = BTreeMap::new();
    for entry in entries {
        days.entry(DayKey::of(&entry.timestamp)).or_default().push(entry);
    }
    days
}

/// Entries of `entries` that fall on `day`
pub fn entries_on(entries: &[FoodEntry], day: DayKey) -> Vec<FoodEntry> {
    entries
        .iter()
        .filter(|e| DayKey::of(&e.timestamp) == day)
        .cloned()
        .collect()
}

/// The food log for one profile
pub struct Tracker<S: Store> {
    store: S,
    profile: String,
}

impl<S: Store> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_profile(store, DEFAULT_PROFILE)
    }

    pub fn with_profile(store: S, profile: &str) -> Self {
        Self {
            store,
            profile: profile.to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Profile ---

    /// Validate and save the profile, returning the derived targets
    pub fn set_user_stats(&self, stats: &UserStats) -> TrackerResult<TargetReport> {
        let report = target_report(stats)?;
        self.store.put_user_stats(&self.profile, stats)?;
        tracing::info!(
            profile = %self.profile,
            calories = report.targets.calories,
            "Saved user stats"
        );
        Ok(report)
    }

    pub fn user_stats(&self) -> TrackerResult<Option<UserStats>> {
        Ok(self.store.get_user_stats(&self.profile)?)
    }

    pub fn target_report(&self) -> TrackerResult<Option<TargetReport>> {
        match self.user_stats()? {
            Some(stats) => Ok(Some(target_report(&stats)?)),
            None => Ok(None),
        }
    }

    pub fn targets(&self) -> TrackerResult<Option<MacroTargets>> {
        Ok(self.target_report()?.map(|r| r.targets))
    }

    // --- Entries ---

    /// Append a food to the day of `now`
    pub fn log_food(&self, data: FoodEntryCreate, now: DateTime<FixedOffset>) -> TrackerResult<FoodEntry> {
        data.validate()?;

        let day = DayKey::of(&now);
        let entry = data.into_entry(Uuid::new_v4(), now);

        let mut entries = self.store.get_entries(day)?.unwrap_or_default();
        entries.push(entry.clone());
        self.store.put_entries(day, &entries)?;

        tracing::info!(day = %day, id = %entry.id, name = %entry.name, calories = entry.calories, "Logged food");
        Ok(entry)
    }

    /// Log `grams` of a catalog product
    pub fn log_product(
        &self,
        product: &FoodProduct,
        grams: f64,
        now: DateTime<FixedOffset>,
    ) -> TrackerResult<FoodEntry> {
        let data = product_to_entry(product, grams)?;
        self.log_food(data, now)
    }

    /// Remove an entry; `false` if the day has no entry with that id
    pub fn delete_entry(&self, day: DayKey, id: Uuid) -> TrackerResult<bool> {
        let Some(mut entries) = self.store.get_entries(day)? else {
            return Ok(false);
        };

        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }

        self.store.put_entries(day, &entries)?;
        tracing::info!(day = %day, id = %id, "Deleted food entry");
        Ok(true)
    }

    pub fn entries_for_day(&self, day: DayKey) -> TrackerResult<Vec<FoodEntry>> {
        Ok(self.store.get_entries(day)?.unwrap_or_default())
    }

    /// Entries logged on the local day of `now`
    pub fn today(&self, now: DateTime<FixedOffset>) -> TrackerResult<Vec<FoodEntry>> {
        self.entries_for_day(DayKey::of(&now))
    }

    pub fn day_summary(&self, day: DayKey) -> TrackerResult<DaySummary> {
        let entries = self.entries_for_day(day)?;
        let targets = self.targets()?;
        Ok(summarize(day, entries, targets))
    }

    /// Most recent logged days with their totals
    pub fn history(&self, limit: usize) -> TrackerResult<Vec<DayOverview>> {
        let mut overview = Vec::new();
        for day in self.store.list_days()?.into_iter().take(limit) {
            let entries = self.entries_for_day(day)?;
            overview.push(DayOverview {
                day,
                entry_count: entries.len(),
                totals: calculate_daily_totals(&entries),
            });
        }
        Ok(overview)
    }

    /// Ids of every stored entry, across all days
    fn known_ids(&self) -> TrackerResult<HashSet<Uuid>> {
        let mut ids = HashSet::new();
        for day in self.store.list_days()? {
            ids.extend(self.entries_for_day(day)?.into_iter().map(|e| e.id));
        }
        Ok(ids)
    }

    /// Merge a flat list of entries into their days.
    ///
    /// An id already stored on any day, or repeated in the input, is
    /// skipped. Collisions are settled before the first write.
    pub fn import_entries(&self, entries: Vec<FoodEntry>) -> TrackerResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut known = self.known_ids()?;

        let mut fresh = Vec::with_capacity(entries.len());
        for entry in entries {
            if known.insert(entry.id) {
                fresh.push(entry);
            } else {
                summary.skipped_existing += 1;
            }
        }

        for (day, incoming) in partition_by_day(fresh) {
            let mut stored = self.store.get_entries(day)?.unwrap_or_default();
            summary.imported += incoming.len();
            stored.extend(incoming);
            stored.sort_by_key(|e| e.timestamp);
            self.store.put_entries(day, &stored)?;
            summary.days_touched.push(day);
        }

        tracing::info!(imported = summary.imported, skipped = summary.skipped_existing, "Imported entries");
        Ok(summary)
    }
}
