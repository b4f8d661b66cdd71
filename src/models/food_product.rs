//! Food Product model
//!
//! Catalog record with nutrition per 100 g, as returned by a lookup.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A product from a nutrition catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProduct {
    /// Catalog identifier; absent for products that never touched our table
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub category: Option<String>,
    pub store: Option<String>,
}

/// Data for adding a product to the local catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodProductCreate {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub category: Option<String>,
    pub store: Option<String>,
}

impl FoodProduct {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get::<_, i64>("id")?.to_string()),
            name: row.get("name")?,
            brand: row.get("brand")?,
            barcode: row.get("barcode")?,
            calories_per_100g: row.get("calories_per_100g")?,
            protein_per_100g: row.get("protein_per_100g")?,
            carbs_per_100g: row.get("carbs_per_100g")?,
            fat_per_100g: row.get("fat_per_100g")?,
            category: row.get("category")?,
            store: row.get("store")?,
        })
    }

    /// Insert a product into the local catalog
    pub fn create(conn: &Connection, data: &FoodProductCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_products (
                name, brand, barcode,
                calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g,
                category, store
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.name,
                data.brand,
                data.barcode,
                data.calories_per_100g,
                data.protein_per_100g,
                data.carbs_per_100g,
                data.fat_per_100g,
                data.category,
                data.store,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_products WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Exact barcode match, at most one product
    pub fn get_by_barcode(conn: &Connection, barcode: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_products WHERE barcode = ?1 ORDER BY id LIMIT 1"
        )?;

        match stmt.query_row([barcode], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive substring match on name or brand.
    ///
    /// Folding happens in Rust because SQLite's `LIKE` only folds ASCII,
    /// and "äpfel" has to find "Äpfel" the same way the remote `ilike` does.
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let needle = query.to_lowercase();
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut stmt = conn.prepare("SELECT * FROM food_products ORDER BY name ASC, id ASC")?;

        let mut products = Vec::new();
        for row in stmt.query_map([], Self::from_row)? {
            if products.len() >= limit {
                break;
            }
            let product = row?;
            let brand_matches = product
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&needle));
            if brand_matches || product.name.to_lowercase().contains(&needle) {
                products.push(product);
            }
        }

        Ok(products)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM food_products", [], |row| row.get(0))?;
        Ok(count)
    }
}
