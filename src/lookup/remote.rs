//! Remote catalog client
//!
//! Talks to a PostgREST-style `food_products` endpoint
//! (`<base>/rest/v1/food_products`). Uses the blocking client; call it
//! from a blocking context, not from an async task.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

use crate::models::FoodProduct;
use super::{FoodLookup, LookupError, LookupResult, SEARCH_LIMIT};

const PRODUCTS_PATH: &str = "rest/v1/food_products";

#[derive(Debug, Clone)]
pub struct RemoteCatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub struct RestCatalog {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

/// Characters with meaning inside a PostgREST `or=(...)` filter
fn sanitize_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '*' | '%' | '\\'))
        .collect()
}

/// Filter matching the term anywhere in name or brand, ignoring case
fn name_or_brand_filter(term: &str) -> String {
    format!("(name.ilike.\"*{term}*\",brand.ilike.\"*{term}*\")")
}

impl RestCatalog {
    pub fn new(config: &RemoteCatalogConfig) -> LookupResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let endpoint = format!("{}/{}", config.base_url.trim_end_matches('/'), PRODUCTS_PATH);

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, query: &[(&str, String)]) -> RequestBuilder {
        let mut request = self.client.get(&self.endpoint).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }
        request
    }

    fn fetch(&self, query: &[(&str, String)]) -> LookupResult<Vec<FoodProduct>> {
        let response = self.request(query).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Remote catalog request failed");
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<Vec<FoodProduct>>()?)
    }
}

impl FoodLookup for RestCatalog {
    fn search_by_name(&self, text: &str) -> LookupResult<Vec<FoodProduct>> {
        let term = sanitize_term(text.trim());
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }

        let products = self.fetch(&[
            ("select", "*".to_string()),
            ("or", name_or_brand_filter(&term)),
            ("limit", SEARCH_LIMIT.to_string()),
        ])?;
        tracing::debug!(term = %term, found = products.len(), "Remote name search");
        Ok(products)
    }

    fn search_by_barcode(&self, code: &str) -> LookupResult<Option<FoodProduct>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let products = self.fetch(&[
            ("select", "*".to_string()),
            ("barcode", format!("eq.{}", code)),
            ("limit", "1".to_string()),
        ])?;
        Ok(products.into_iter().next())
    }
}
