//! Food Log MCP Tools
//!
//! Tools for logging foods, reading days and removing entries.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::lookup::{FoodLookup, SqliteCatalog};
use crate::models::{FoodEntry, FoodEntryCreate, FoodProduct};
use crate::store::{DayKey, Store};
use crate::tracker::{DayOverview, DaySummary, ImportSummary, Tracker};

/// Response for log_food and log_product
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: FoodEntry,
    pub day: DaySummary,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub days: Vec<DayOverview>,
    pub limit: usize,
}

/// Which catalog product to log
#[derive(Debug, Clone)]
pub enum ProductRef {
    /// Row id in the local catalog
    Id(i64),
    /// Barcode resolved through the configured lookup
    Barcode(String),
}

fn parse_day(date: &str) -> Result<DayKey, String> {
    date.trim()
        .parse::<DayKey>()
        .map_err(|e| format!("Invalid date '{}' (expected YYYY-MM-DD): {}", date, e))
}

fn logged<S: Store>(tracker: &Tracker<S>, entry: FoodEntry) -> Result<LogFoodResponse, String> {
    let day = tracker
        .day_summary(DayKey::of(&entry.timestamp))
        .map_err(|e| format!("Failed to summarize day: {}", e))?;
    Ok(LogFoodResponse { entry, day })
}

/// Log a food with explicit macros at `now`
pub fn log_food<S: Store>(
    tracker: &Tracker<S>,
    data: FoodEntryCreate,
    now: DateTime<FixedOffset>,
) -> Result<LogFoodResponse, String> {
    let entry = tracker
        .log_food(data, now)
        .map_err(|e| format!("Failed to log food: {}", e))?;
    logged(tracker, entry)
}

/// Find a product by local id or barcode. Must run off the async runtime
/// when `lookup` is a remote catalog.
pub fn resolve_product(
    catalog: &SqliteCatalog,
    lookup: &dyn FoodLookup,
    product: &ProductRef,
) -> Result<FoodProduct, String> {
    match product {
        ProductRef::Id(id) => catalog
            .get_product(*id)
            .map_err(|e| format!("Failed to load product: {}", e))?
            .ok_or_else(|| format!("Product {} not found", id)),
        ProductRef::Barcode(code) => lookup
            .search_by_barcode(code)
            .map_err(|e| format!("Barcode lookup failed: {}", e))?
            .ok_or_else(|| format!("No product with barcode {}", code)),
    }
}

/// Log `grams` of a catalog product at `now`
pub fn log_product<S: Store>(
    tracker: &Tracker<S>,
    product: &FoodProduct,
    grams: f64,
    now: DateTime<FixedOffset>,
) -> Result<LogFoodResponse, String> {
    let entry = tracker
        .log_product(product, grams, now)
        .map_err(|e| format!("Failed to log product: {}", e))?;
    logged(tracker, entry)
}

/// Summary for a YYYY-MM-DD day; empty days still report targets
pub fn get_day<S: Store>(tracker: &Tracker<S>, date: &str) -> Result<DaySummary, String> {
    let day = parse_day(date)?;
    tracker
        .day_summary(day)
        .map_err(|e| format!("Failed to get day: {}", e))
}

pub fn get_today<S: Store>(tracker: &Tracker<S>, now: DateTime<FixedOffset>) -> Result<DaySummary, String> {
    tracker
        .day_summary(DayKey::of(&now))
        .map_err(|e| format!("Failed to get today: {}", e))
}

pub fn delete_food_entry<S: Store>(tracker: &Tracker<S>, date: &str, id: &str) -> Result<bool, String> {
    let day = parse_day(date)?;
    let id = Uuid::parse_str(id.trim()).map_err(|e| format!("Invalid entry id '{}': {}", id, e))?;
    tracker
        .delete_entry(day, id)
        .map_err(|e| format!("Failed to delete entry: {}", e))
}

pub fn list_days<S: Store>(tracker: &Tracker<S>, limit: usize) -> Result<ListDaysResponse, String> {
    let days = tracker
        .history(limit)
        .map_err(|e| format!("Failed to list days: {}", e))?;
    Ok(ListDaysResponse { days, limit })
}

/// Import entries exported elsewhere; ids already present are skipped
pub fn import_entries<S: Store>(tracker: &Tracker<S>, entries: Vec<FoodEntry>) -> Result<ImportSummary, String> {
    tracker
        .import_entries(entries)
        .map_err(|e| format!("Failed to import entries: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::FoodProductCreate;
    use crate::store::MemoryStore;

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn toast() -> FoodEntryCreate {
        FoodEntryCreate {
            name: "Toast".to_string(),
            quantity: 2.0,
            unit: "slice".to_string(),
            calories: 160,
            protein: 6.0,
            carbs: 28.0,
            fats: 2.0,
        }
    }

    #[test]
    fn test_log_and_get_day() {
        let tracker = Tracker::new(MemoryStore::new());
        let response = log_food(&tracker, toast(), at("2025-03-02T07:30:00-05:00")).unwrap();
        assert_eq!(response.day.day.to_string(), "2025-03-02");
        assert_eq!(response.day.totals.calories, 160);

        let day = get_day(&tracker, "2025-03-02").unwrap();
        assert_eq!(day.entries, vec![response.entry]);
        assert!(get_day(&tracker, "03/02/2025").is_err());
    }

    #[test]
    fn test_get_today_uses_local_day() {
        let tracker = Tracker::new(MemoryStore::new());
        log_food(&tracker, toast(), at("2025-03-02T23:30:00-05:00")).unwrap();

        let same_evening = get_today(&tracker, at("2025-03-02T23:59:00-05:00")).unwrap();
        assert_eq!(same_evening.entries.len(), 1);
        let next_morning = get_today(&tracker, at("2025-03-03T00:01:00-05:00")).unwrap();
        assert!(next_morning.entries.is_empty());
    }

    #[test]
    fn test_delete_food_entry() {
        let tracker = Tracker::new(MemoryStore::new());
        let logged = log_food(&tracker, toast(), at("2025-03-02T07:30:00Z")).unwrap();
        let id = logged.entry.id.to_string();

        assert!(delete_food_entry(&tracker, "2025-03-02", "not-a-uuid").is_err());
        assert!(!delete_food_entry(&tracker, "2025-03-01", &id).unwrap());
        assert!(delete_food_entry(&tracker, "2025-03-02", &id).unwrap());
        assert!(list_days(&tracker, 10).unwrap().days.is_empty());
    }

    #[test]
    fn test_log_product_by_id_and_barcode() {
        let catalog = SqliteCatalog::new(db::open_in_memory().unwrap());
        let product = catalog
            .add_product(&FoodProductCreate {
                name: "Rolled Oats".to_string(),
                brand: None,
                barcode: Some("96385074".to_string()),
                calories_per_100g: 379.0,
                protein_per_100g: 13.2,
                carbs_per_100g: 67.7,
                fat_per_100g: 6.5,
                category: Some("grains".to_string()),
                store: None,
            })
            .unwrap();
        let id: i64 = product.id.as_deref().unwrap().parse().unwrap();

        let by_id = resolve_product(&catalog, &catalog, &ProductRef::Id(id)).unwrap();
        let by_code = resolve_product(&catalog, &catalog, &ProductRef::Barcode("96385074".to_string())).unwrap();
        assert_eq!(by_id, by_code);
        assert!(resolve_product(&catalog, &catalog, &ProductRef::Id(id + 1)).is_err());

        let tracker = Tracker::new(MemoryStore::new());
        let response = log_product(&tracker, &by_id, 40.0, at("2025-03-02T07:30:00Z")).unwrap();
        assert_eq!(response.entry.calories, 152);
        assert_eq!(response.entry.protein, 5.3);
        assert_eq!(response.entry.unit, "g");
        assert!(log_product(&tracker, &by_id, 0.0, at("2025-03-02T07:30:00Z")).is_err());
    }

    #[test]
    fn test_import_entries() {
        let tracker = Tracker::new(MemoryStore::new());
        let entry = toast().into_entry(Uuid::new_v4(), at("2025-02-28T12:00:00Z"));

        let first = import_entries(&tracker, vec![entry.clone()]).unwrap();
        assert_eq!(first.imported, 1);
        let second = import_entries(&tracker, vec![entry]).unwrap();
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(list_days(&tracker, 10).unwrap().days.len(), 1);
    }
}
