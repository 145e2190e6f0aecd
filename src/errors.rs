/// Domain-specific error types for marketsearch
///
/// Only the catalog fetch is allowed to fail a search. Everything the ranking
/// core touches after that is total, so most variants here come from the
/// surrounding service: configuration, storage and lookups by id.

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>
    },

    #[error("Listing not found: {id}")]
    NotFound {
        id: String
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The catalog provider could not supply listings for a search.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl From<sqlx::Error> for MarketError {
    fn from(e: sqlx::Error) -> Self {
        MarketError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(e: serde_json::Error) -> Self {
        MarketError::Storage(format!("Invalid catalog JSON: {}", e))
    }
}

impl MarketError {
    /// Helper to create validation errors with field names
    ///
    /// Example:
    /// ```
    /// use marketsearch::errors::MarketError;
    /// let err = MarketError::validation("id", "Listing id must be numeric");
    /// ```
    pub fn validation(field: &str, message: &str) -> Self {
        MarketError::Validation {
            message: message.to_string(),
            field: Some(field.to_string()),
        }
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::Validation { .. } => "VALIDATION_ERROR",
            MarketError::NotFound { .. } => "NOT_FOUND",
            MarketError::Config(_) => "CONFIG_ERROR",
            MarketError::Internal(_) => "INTERNAL_ERROR",
            MarketError::Storage(_) => "STORAGE_ERROR",
            MarketError::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
        }
    }
}
