//! In-process store, for tests and ephemeral sessions

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::models::{FoodEntry, UserStats};
use super::{check_day, DayKey, Store, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    days: BTreeMap<DayKey, Vec<FoodEntry>>,
    profiles: HashMap<String, UserStats>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get_entries(&self, day: DayKey) -> StoreResult<Option<Vec<FoodEntry>>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.days.get(&day).cloned())
    }

    fn put_entries(&self, day: DayKey, entries: &[FoodEntry]) -> StoreResult<()> {
        check_day(day, entries)?;
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if entries.is_empty() {
            inner.days.remove(&day);
        } else {
            inner.days.insert(day, entries.to_vec());
        }
        Ok(())
    }

    fn list_days(&self) -> StoreResult<Vec<DayKey>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.days.keys().rev().copied().collect())
    }

    fn get_user_stats(&self, profile: &str) -> StoreResult<Option<UserStats>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.profiles.get(profile).cloned())
    }

    fn put_user_stats(&self, profile: &str, stats: &UserStats) -> StoreResult<()> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.profiles.insert(profile.to_string(), stats.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use uuid::Uuid;

    use crate::models::FoodEntryCreate;

    fn entry(ts: &str) -> FoodEntry {
        FoodEntryCreate {
            name: "Apple".to_string(),
            quantity: 1.0,
            unit: "piece".to_string(),
            calories: 95,
            protein: 0.5,
            carbs: 25.0,
            fats: 0.3,
        }
        .into_entry(Uuid::new_v4(), DateTime::parse_from_rfc3339(ts).unwrap())
    }

    #[test]
    fn test_put_get_list() {
        let store = MemoryStore::new();
        let a = entry("2025-02-01T09:00:00+00:00");
        let b = entry("2025-02-03T09:00:00+00:00");
        store.put_entries(DayKey::of(&a.timestamp), &[a.clone()]).unwrap();
        store.put_entries(DayKey::of(&b.timestamp), &[b.clone()]).unwrap();

        assert_eq!(store.get_entries(DayKey::of(&a.timestamp)).unwrap(), Some(vec![a]));
        let days = store.list_days().unwrap();
        assert_eq!(days[0], DayKey::of(&b.timestamp));
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn test_empty_put_removes_day() {
        let store = MemoryStore::new();
        let a = entry("2025-02-01T09:00:00+00:00");
        let day = DayKey::of(&a.timestamp);
        store.put_entries(day, &[a]).unwrap();
        store.put_entries(day, &[]).unwrap();
        assert_eq!(store.get_entries(day).unwrap(), None);
    }
}
