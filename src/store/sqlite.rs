//! SQLite-backed store

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{Database, DbResult};
use crate::models::{ActivityLevel, FoodEntry, Gender, Goal, MacroSplitKind, UserStats};
use super::{check_day, DayKey, Store, StoreResult};

/// Store over the `food_entries` and `user_profiles` tables
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

/// Parse a TEXT column, reporting failures as a conversion error on that column
fn parse_column<T, E, F>(row: &Row, column: &str, parse: F) -> rusqlite::Result<T>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(column)?;
    parse(&raw).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

fn entry_from_row(row: &Row) -> rusqlite::Result<FoodEntry> {
    Ok(FoodEntry {
        id: parse_column(row, "id", Uuid::parse_str)?,
        name: row.get("name")?,
        quantity: row.get("quantity")?,
        unit: row.get("unit")?,
        calories: row.get("calories")?,
        protein: row.get("protein")?,
        carbs: row.get("carbs")?,
        fats: row.get("fats")?,
        timestamp: parse_column(row, "timestamp", DateTime::parse_from_rfc3339)?,
    })
}

fn stats_from_row(row: &Row) -> rusqlite::Result<UserStats> {
    Ok(UserStats {
        age: row.get("age")?,
        gender: parse_column(row, "gender", Gender::from_str)?,
        weight: row.get("weight")?,
        height: row.get("height")?,
        activity_level: parse_column(row, "activity_level", ActivityLevel::from_str)?,
        goal: Goal::from_str(&row.get::<_, String>("goal")?),
        macro_split: parse_column(row, "macro_split", MacroSplitKind::from_str)?,
    })
}

fn insert_entry(conn: &Connection, day: DayKey, position: usize, entry: &FoodEntry) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO food_entries (
            id, day_key, position, name, quantity, unit,
            calories, protein, carbs, fats, timestamp
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            entry.id.to_string(),
            day.to_string(),
            position as i64,
            entry.name,
            entry.quantity,
            entry.unit,
            entry.calories,
            entry.protein,
            entry.carbs,
            entry.fats,
            entry.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        ],
    )?;
    Ok(())
}

impl SqliteStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl Store for SqliteStore {
    fn get_entries(&self, day: DayKey) -> StoreResult<Option<Vec<FoodEntry>>> {
        let entries = self.database.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM food_entries WHERE day_key = ?1 ORDER BY position ASC"
            )?;
            let entries = stmt
                .query_map([day.to_string()], entry_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })?;

        Ok(if entries.is_empty() { None } else { Some(entries) })
    }

    fn put_entries(&self, day: DayKey, entries: &[FoodEntry]) -> StoreResult<()> {
        check_day(day, entries)?;

        self.database.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM food_entries WHERE day_key = ?1", [day.to_string()])?;
            for (position, entry) in entries.iter().enumerate() {
                insert_entry(&tx, day, position, entry)?;
            }
            tx.commit()?;
            Ok(())
        })?;

        tracing::debug!(day = %day, count = entries.len(), "stored day entries");
        Ok(())
    }

    fn list_days(&self) -> StoreResult<Vec<DayKey>> {
        let raw: Vec<String> = self.database.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT day_key FROM food_entries ORDER BY day_key DESC"
            )?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })?;

        let mut days = Vec::with_capacity(raw.len());
        for key in raw {
            match key.parse::<DayKey>() {
                Ok(day) => days.push(day),
                Err(e) => tracing::warn!("Skipping malformed day key '{}': {}", key, e),
            }
        }
        Ok(days)
    }

    fn get_user_stats(&self, profile: &str) -> StoreResult<Option<UserStats>> {
        let stats = self.database.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE profile_key = ?1")?;
            match stmt.query_row([profile], stats_from_row) {
                Ok(stats) => Ok(Some(stats)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })?;
        Ok(stats)
    }

    fn put_user_stats(&self, profile: &str, stats: &UserStats) -> StoreResult<()> {
        self.database.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO user_profiles (
                    profile_key, age, gender, weight, height, activity_level, goal, macro_split
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(profile_key) DO UPDATE SET
                    age = excluded.age,
                    gender = excluded.gender,
                    weight = excluded.weight,
                    height = excluded.height,
                    activity_level = excluded.activity_level,
                    goal = excluded.goal,
                    macro_split = excluded.macro_split,
                    updated_at = datetime('now')
                "#,
                params![
                    profile,
                    stats.age,
                    stats.gender.as_str(),
                    stats.weight,
                    stats.height,
                    stats.activity_level.as_str(),
                    stats.goal.as_str(),
                    stats.macro_split.as_str(),
                ],
            )?;
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::FoodEntryCreate;
    use crate::store::{StoreError, DEFAULT_PROFILE};

    fn store() -> SqliteStore {
        SqliteStore::new(db::open_in_memory().unwrap())
    }

    fn entry(name: &str, ts: &str) -> FoodEntry {
        FoodEntryCreate {
            name: name.to_string(),
            quantity: 1.0,
            unit: "serving".to_string(),
            calories: 250,
            protein: 12.5,
            carbs: 30.1,
            fats: 8.0,
        }
        .into_entry(Uuid::new_v4(), DateTime::parse_from_rfc3339(ts).unwrap())
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let store = store();
        let day: DayKey = "2025-01-09".parse().unwrap();
        let entries = vec![
            entry("Toast", "2025-01-09T07:45:12.345678901+01:00"),
            entry("Soup", "2025-01-09T12:00:00+01:00"),
        ];
        store.put_entries(day, &entries).unwrap();

        let loaded = store.get_entries(day).unwrap().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_missing_day_is_none() {
        let store = store();
        let day: DayKey = "2025-01-09".parse().unwrap();
        assert!(store.get_entries(day).unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_day() {
        let store = store();
        let day: DayKey = "2025-01-09".parse().unwrap();
        let first = entry("Toast", "2025-01-09T07:00:00+00:00");
        let second = entry("Soup", "2025-01-09T12:00:00+00:00");
        store.put_entries(day, &[first.clone(), second.clone()]).unwrap();
        store.put_entries(day, &[second.clone()]).unwrap();
        assert_eq!(store.get_entries(day).unwrap().unwrap(), vec![second]);

        store.put_entries(day, &[]).unwrap();
        assert!(store.get_entries(day).unwrap().is_none());
        assert!(store.list_days().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_entry_from_other_day() {
        let store = store();
        let day: DayKey = "2025-01-09".parse().unwrap();
        let late = entry("Snack", "2025-01-10T00:05:00+00:00");
        let err = store.put_entries(day, &[late]).unwrap_err();
        assert!(matches!(err, StoreError::DayMismatch { .. }));
    }

    #[test]
    fn test_list_days_newest_first() {
        let store = store();
        for ts in ["2025-01-08T10:00:00Z", "2025-01-10T10:00:00Z", "2025-01-09T10:00:00Z"] {
            let e = entry("x", ts);
            store.put_entries(DayKey::of(&e.timestamp), &[e]).unwrap();
        }
        let days: Vec<String> = store.list_days().unwrap().iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2025-01-10", "2025-01-09", "2025-01-08"]);
    }

    #[test]
    fn test_user_stats_upsert() {
        let store = store();
        assert!(store.get_user_stats(DEFAULT_PROFILE).unwrap().is_none());

        let mut stats = UserStats {
            age: 31,
            gender: Gender::Female,
            weight: 62.5,
            height: 168.0,
            activity_level: ActivityLevel::Light,
            goal: Goal::Cut,
            macro_split: MacroSplitKind::HighProtein,
        };
        store.put_user_stats(DEFAULT_PROFILE, &stats).unwrap();
        assert_eq!(store.get_user_stats(DEFAULT_PROFILE).unwrap(), Some(stats.clone()));

        stats.weight = 61.0;
        stats.goal = Goal::Maintain;
        store.put_user_stats(DEFAULT_PROFILE, &stats).unwrap();
        assert_eq!(store.get_user_stats(DEFAULT_PROFILE).unwrap(), Some(stats));
    }
}
