//! Entry and profile storage
//!
//! A narrow key-value interface: food entries partitioned by `DayKey`,
//! and user stats keyed by profile name.

mod day_key;
mod memory;
mod sqlite;

use thiserror::Error;
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{FoodEntry, UserStats};

pub use day_key::DayKey;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key of the single active profile
pub const DEFAULT_PROFILE: &str = "user-stats";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Entry {id} was logged on {actual}, cannot be stored under {expected}")]
    DayMismatch {
        id: Uuid,
        expected: DayKey,
        actual: DayKey,
    },

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence consumed by the tracker.
///
/// Writes replace a whole day; the last write wins.
pub trait Store: Send + Sync {
    /// Entries for a day in logging order, `None` if nothing was stored
    fn get_entries(&self, day: DayKey) -> StoreResult<Option<Vec<FoodEntry>>>;

    /// Replace a day's entries. An empty slice removes the day.
    fn put_entries(&self, day: DayKey, entries: &[FoodEntry]) -> StoreResult<()>;

    /// Days holding at least one entry, newest first
    fn list_days(&self) -> StoreResult<Vec<DayKey>>;

    fn get_user_stats(&self, profile: &str) -> StoreResult<Option<UserStats>>;

    fn put_user_stats(&self, profile: &str, stats: &UserStats) -> StoreResult<()>;
}

/// Every entry must fall on the day it is filed under
pub(crate) fn check_day(day: DayKey, entries: &[FoodEntry]) -> StoreResult<()> {
    for entry in entries {
        let actual = DayKey::of(&entry.timestamp);
        if actual != day {
            return Err(StoreError::DayMismatch {
                id: entry.id,
                expected: day,
                actual,
            });
        }
    }
    Ok(())
}
