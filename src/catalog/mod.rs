/// Listing catalog abstraction layer
///
/// Provides the CatalogProvider trait and the listing/category records it serves.
/// The search core only ever sees a flat, already-denormalized Vec<Listing>;
/// how the provider assembles it (SQL join, JSON file) stays behind the trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MarketError;
use crate::search::SearchField;

pub mod json;
pub mod postgres;

/// A marketplace item as served to search and to API clients.
///
/// Every text field is optional; search treats a missing field as "".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Denormalized from the categories table
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Free text such as "new", "used - good"
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Text of a searchable field, "" when absent.
    pub fn field_text(&self, field: SearchField) -> &str {
        let value = match field {
            SearchField::Title => &self.title,
            SearchField::Description => &self.description,
            SearchField::CategoryName => &self.category_name,
            SearchField::Location => &self.location,
            SearchField::Condition => &self.condition,
        };
        value.as_deref().unwrap_or("")
    }
}

/// A listing category. The catalog exposes categories as a flat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Source of listings for search and lookup.
///
/// Implementations must be Send + Sync so one provider can be shared by every
/// request handler behind an Arc.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Every listing, denormalized with its category name, in catalog order.
    async fn all_listings(&self) -> Result<Vec<Listing>, MarketError>;

    /// A single listing by id. Returns NotFound if it doesn't exist.
    async fn listing(&self, id: i64) -> Result<Listing, MarketError>;

    /// All categories, flat.
    async fn categories(&self) -> Result<Vec<Category>, MarketError>;
}
