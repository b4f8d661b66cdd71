//! Barcode scanning
//!
//! The scanner itself lives outside this crate (camera hardware, a
//! handheld reader). This module defines what it yields and how a
//! decoded code is checked and resolved against a catalog.

use serde::Serialize;
use thiserror::Error;

use crate::lookup::{FoodLookup, LookupError};
use crate::models::FoodProduct;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Camera permission was not granted")]
    NoPermission,

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Scanner device error: {0}")]
    DeviceError(String),

    #[error("Not a valid product barcode: {0}")]
    InvalidBarcode(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// A source of decoded barcodes
pub trait BarcodeScanner {
    fn scan(&mut self) -> Result<String, ScanError>;
}

/// Scanner fed by a typed-in code. An empty code counts as a cancel.
pub struct ManualEntry {
    code: Option<String>,
}

impl ManualEntry {
    pub fn new(code: &str) -> Self {
        let code = code.trim();
        Self {
            code: (!code.is_empty()).then(|| code.to_string()),
        }
    }
}

impl BarcodeScanner for ManualEntry {
    fn scan(&mut self) -> Result<String, ScanError> {
        self.code.take().ok_or(ScanError::Cancelled)
    }
}

/// Check a GTIN-8/12/13/14 code: digits only, valid mod-10 check digit
pub fn validate_gtin(code: &str) -> Result<(), ScanError> {
    let invalid = || ScanError::InvalidBarcode(code.to_string());

    if !matches!(code.len(), 8 | 12 | 13 | 14) {
        return Err(invalid());
    }
    let digits: Vec<u32> = code
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)?;

    let (body, check) = digits.split_at(digits.len() - 1);
    // Weights alternate 3,1,3,... starting from the digit next to the check digit
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    let expected = (10 - sum % 10) % 10;

    if check[0] == expected {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Result of scanning and resolving a barcode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    Found { barcode: String, product: FoodProduct },
    NotFound { barcode: String },
}

/// Scan once, validate the code, and look it up
pub fn scan_and_lookup<S, L>(scanner: &mut S, lookup: &L) -> Result<ScanOutcome, ScanError>
where
    S: BarcodeScanner + ?Sized,
    L: FoodLookup + ?Sized,
{
    let barcode = scanner.scan()?.trim().to_string();
    validate_gtin(&barcode)?;

    match lookup.search_by_barcode(&barcode)? {
        Some(product) => Ok(ScanOutcome::Found { barcode, product }),
        None => {
            tracing::info!(barcode = %barcode, "Barcode not in catalog");
            Ok(ScanOutcome::NotFound { barcode })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::lookup::SqliteCatalog;
    use crate::models::FoodProductCreate;

    struct Denied;

    impl BarcodeScanner for Denied {
        fn scan(&mut self) -> Result<String, ScanError> {
            Err(ScanError::NoPermission)
        }
    }

    #[test]
    fn test_validate_gtin() {
        assert!(validate_gtin("5201054017760").is_ok()); // EAN-13
        assert!(validate_gtin("036000291452").is_ok()); // UPC-A
        assert!(validate_gtin("96385074").is_ok()); // EAN-8
        assert!(validate_gtin("5201054017761").is_err());
        assert!(validate_gtin("52010540177").is_err());
        assert!(validate_gtin("52010540177a0").is_err());
    }

    #[test]
    fn test_manual_entry() {
        let mut scanner = ManualEntry::new(" 96385074 ");
        assert_eq!(scanner.scan().unwrap(), "96385074");
        assert!(matches!(scanner.scan(), Err(ScanError::Cancelled)));
        assert!(matches!(ManualEntry::new("").scan(), Err(ScanError::Cancelled)));
    }

    #[test]
    fn test_scan_and_lookup() {
        let catalog = SqliteCatalog::new(db::open_in_memory().unwrap());
        catalog
            .add_product(&FoodProductCreate {
                name: "Cola".to_string(),
                brand: None,
                barcode: Some("036000291452".to_string()),
                calories_per_100g: 42.0,
                protein_per_100g: 0.0,
                carbs_per_100g: 10.6,
                fat_per_100g: 0.0,
                category: None,
                store: None,
            })
            .unwrap();

        let found = scan_and_lookup(&mut ManualEntry::new("036000291452"), &catalog).unwrap();
        assert!(matches!(found, ScanOutcome::Found { ref product, .. } if product.name == "Cola"));

        let missing = scan_and_lookup(&mut ManualEntry::new("96385074"), &catalog).unwrap();
        assert!(matches!(missing, ScanOutcome::NotFound { .. }));

        let bad = scan_and_lookup(&mut ManualEntry::new("12345"), &catalog);
        assert!(matches!(bad, Err(ScanError::InvalidBarcode(_))));

        assert!(matches!(scan_and_lookup(&mut Denied, &catalog), Err(ScanError::NoPermission)));
    }
}
