//! Local catalog over the `food_products` table

use crate::db::Database;
use crate::models::{FoodProduct, FoodProductCreate};
use super::{FoodLookup, LookupResult, SEARCH_LIMIT};

#[derive(Clone)]
pub struct SqliteCatalog {
    database: Database,
}

impl SqliteCatalog {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    pub fn add_product(&self, data: &FoodProductCreate) -> LookupResult<FoodProduct> {
        let product = self.database.with_conn(|conn| FoodProduct::create(conn, data))?;
        tracing::info!(name = %product.name, barcode = ?product.barcode, "Added catalog product");
        Ok(product)
    }

    pub fn get_product(&self, id: i64) -> LookupResult<Option<FoodProduct>> {
        Ok(self.database.with_conn(|conn| FoodProduct::get_by_id(conn, id))?)
    }

    pub fn count(&self) -> LookupResult<i64> {
        Ok(self.database.with_conn(FoodProduct::count)?)
    }
}

impl FoodLookup for SqliteCatalog {
    fn search_by_name(&self, text: &str) -> LookupResult<Vec<FoodProduct>> {
        let term = text.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.database.with_conn(|conn| FoodProduct::search(conn, term, SEARCH_LIMIT))?)
    }

    fn search_by_barcode(&self, code: &str) -> LookupResult<Option<FoodProduct>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }
        Ok(self.database.with_conn(|conn| FoodProduct::get_by_barcode(conn, code))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn catalog() -> SqliteCatalog {
        let catalog = SqliteCatalog::new(db::open_in_memory().unwrap());
        for (name, brand, barcode) in [
            ("Greek Yogurt", Some("Fage"), Some("5201054017760")),
            ("Peanut Butter", Some("Yogi Foods"), None),
            ("Rolled Oats", None, Some("0041570054161")),
        ] {
            catalog
                .add_product(&FoodProductCreate {
                    name: name.to_string(),
                    brand: brand.map(str::to_string),
                    barcode: barcode.map(str::to_string),
                    calories_per_100g: 100.0,
                    protein_per_100g: 10.0,
                    carbs_per_100g: 10.0,
                    fat_per_100g: 1.0,
                    category: None,
                    store: None,
                })
                .unwrap();
        }
        catalog
    }

    #[test]
    fn test_search_matches_name_or_brand_case_insensitive() {
        let catalog = catalog();
        let names: Vec<String> = catalog
            .search_by_name("yog")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Greek Yogurt", "Peanut Butter"]);
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let catalog = catalog();
        catalog
            .add_product(&FoodProductCreate {
                name: "Äpfel".to_string(),
                brand: Some("Öko Hof".to_string()),
                barcode: None,
                calories_per_100g: 52.0,
                protein_per_100g: 0.3,
                carbs_per_100g: 14.0,
                fat_per_100g: 0.2,
                category: None,
                store: None,
            })
            .unwrap();

        for query in ["äpfel", "ÄPF", "öko"] {
            let found = catalog.search_by_name(query).unwrap();
            assert_eq!(found.len(), 1, "query {query}");
            assert_eq!(found[0].name, "Äpfel");
        }
        assert!(catalog.search_by_name("%").unwrap().is_empty());
    }

    #[test]
    fn test_blank_search_is_empty() {
        assert!(catalog().search_by_name("   ").unwrap().is_empty());
    }

    #[test]
    fn test_barcode_lookup() {
        let catalog = catalog();
        let found = catalog.search_by_barcode("0041570054161").unwrap().unwrap();
        assert_eq!(found.name, "Rolled Oats");
        assert!(found.id.is_some());
        assert!(catalog.search_by_barcode("0000000000000").unwrap().is_none());
        assert_eq!(catalog.count().unwrap(), 3);
    }
}
