/// File-backed catalog held in memory.
///
/// Loads a JSON array of listings once. Used by the `search` subcommand, by
/// `serve --catalog` for demos, and by tests that need a real provider without
/// a database.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

use crate::catalog::{CatalogProvider, Category, Listing};
use crate::errors::MarketError;

pub struct JsonCatalog {
    listings: Vec<Listing>,
}

impl JsonCatalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        JsonCatalog { listings }
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MarketError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MarketError::Storage(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), count = catalog.listings.len(), "JSON catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, MarketError> {
        let listings: Vec<Listing> = serde_json::from_str(raw)?;
        Ok(JsonCatalog::new(listings))
    }
}

#[async_trait]
impl CatalogProvider for JsonCatalog {
    async fn all_listings(&self) -> Result<Vec<Listing>, MarketError> {
        Ok(self.listings.clone())
    }

    async fn listing(&self, id: i64) -> Result<Listing, MarketError> {
        self.listings
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| MarketError::NotFound { id: id.to_string() })
    }

    /// Distinct (categoryId, categoryName) pairs in first-seen order.
    async fn categories(&self) -> Result<Vec<Category>, MarketError> {
        let mut seen = HashSet::new();
        let categories = self
            .listings
            .iter()
            .filter_map(|l| {
                let id = l.category_id?;
                let name = l.category_name.clone().unwrap_or_default();
                seen.insert(id).then_some(Category { id, name, parent_id: None })
            })
            .collect();
        Ok(categories)
    }
}
