//! Food lookup
//!
//! Name and barcode queries against a nutrition catalog. Two backends:
//! the local `food_products` table and a remote REST catalog.

mod catalog;
mod remote;

use thiserror::Error;

use crate::db::DbError;
use crate::models::FoodProduct;

pub use catalog::SqliteCatalog;
pub use remote::{RemoteCatalogConfig, RestCatalog};

/// Maximum products returned by a name search
pub const SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Catalog database error: {0}")]
    Database(#[from] DbError),
}

pub type LookupResult<T> = Result<T, LookupError>;

/// A nutrition catalog. Retrying failed calls is the caller's choice.
pub trait FoodLookup: Send + Sync {
    /// Products whose name or brand contains `text`. Blank text matches nothing.
    fn search_by_name(&self, text: &str) -> LookupResult<Vec<FoodProduct>>;

    /// The product with this barcode, if the catalog knows it
    fn search_by_barcode(&self, code: &str) -> LookupResult<Option<FoodProduct>>;
}
