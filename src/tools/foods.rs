//! Food Catalog MCP Tools
//!
//! Name search, barcode lookup and adding products to the local catalog.
//! Searches go through whichever `FoodLookup` the server was configured
//! with; call them from a blocking context.

use serde::Serialize;

use crate::lookup::{FoodLookup, SqliteCatalog};
use crate::models::{FoodProduct, FoodProductCreate};
use crate::scanner::{scan_and_lookup, ManualEntry, ScanOutcome};

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub query: String,
    pub products: Vec<FoodProduct>,
}

/// Response for add_food_product
#[derive(Debug, Serialize)]
pub struct AddFoodProductResponse {
    pub product: FoodProduct,
    pub catalog_size: i64,
}

pub fn search_foods(lookup: &dyn FoodLookup, query: &str) -> Result<SearchFoodsResponse, String> {
    let products = lookup
        .search_by_name(query)
        .map_err(|e| format!("Food search failed: {}", e))?;
    Ok(SearchFoodsResponse {
        query: query.trim().to_string(),
        products,
    })
}

/// Validate a typed barcode and resolve it
pub fn lookup_barcode(lookup: &dyn FoodLookup, barcode: &str) -> Result<ScanOutcome, String> {
    let mut scanner = ManualEntry::new(barcode);
    scan_and_lookup(&mut scanner, lookup).map_err(|e| format!("Barcode lookup failed: {}", e))
}

pub fn add_food_product(catalog: &SqliteCatalog, data: FoodProductCreate) -> Result<AddFoodProductResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Product name must not be empty".to_string());
    }
    let per_100g = [
        data.calories_per_100g,
        data.protein_per_100g,
        data.carbs_per_100g,
        data.fat_per_100g,
    ];
    if per_100g.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("Nutrition values per 100 g must be non-negative numbers".to_string());
    }

    let product = catalog
        .add_product(&data)
        .map_err(|e| format!("Failed to add product: {}", e))?;
    let catalog_size = catalog
        .count()
        .map_err(|e| format!("Failed to count products: {}", e))?;

    Ok(AddFoodProductResponse { product, catalog_size })
}
