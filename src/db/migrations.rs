//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOOD ENTRIES
        -- Logged foods, partitioned by calendar day
        -- ============================================
        CREATE TABLE food_entries (
            id TEXT PRIMARY KEY,                 -- UUID, never reused
            day_key TEXT NOT NULL,               -- ISO date: "2025-01-09"
            position INTEGER NOT NULL,           -- order within the day
            name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,

            calories INTEGER NOT NULL DEFAULT 0 CHECK(calories >= 0),
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fats REAL NOT NULL DEFAULT 0,        -- grams

            timestamp TEXT NOT NULL              -- RFC 3339 with offset
        );

        CREATE INDEX idx_food_entries_day ON food_entries(day_key, position);

        -- ============================================
        -- USER PROFILES
        -- Body stats the targets are derived from
        -- ============================================
        CREATE TABLE user_profiles (
            profile_key TEXT PRIMARY KEY,
            age INTEGER NOT NULL,
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            weight REAL NOT NULL,                -- kg
            height REAL NOT NULL,                -- cm
            activity_level TEXT NOT NULL CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'very', 'extreme')),
            goal TEXT NOT NULL DEFAULT 'maintain',
            macro_split TEXT NOT NULL CHECK(macro_split IN ('balanced', 'high-protein', 'low-carb', 'high-carb', 'custom')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD PRODUCTS
        -- Local catalog, nutrition per 100 g
        -- ============================================
        CREATE TABLE food_products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            brand TEXT,
            barcode TEXT,
            calories_per_100g REAL NOT NULL DEFAULT 0,
            protein_per_100g REAL NOT NULL DEFAULT 0,
            carbs_per_100g REAL NOT NULL DEFAULT 0,
            fat_per_100g REAL NOT NULL DEFAULT 0,
            category TEXT,
            store TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_products_name ON food_products(name);
        CREATE INDEX idx_food_products_barcode ON food_products(barcode);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
