/// PostgreSQL-backed implementation of CatalogProvider
///
/// Uses sqlx with PgPool for connection pooling.
/// Supports optional migration execution on startup.

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions, PgRow},
    Row,
};
use std::time::Duration;

use crate::catalog::{CatalogProvider, Category, Listing};
use crate::errors::MarketError;

const LISTING_COLUMNS: &str = "l.id, l.title, l.description, l.category_id, c.name AS category_name, \
     l.location, l.condition, l.price_cents, l.seller_id, l.image_url, l.created_at";

/// PostgreSQL-backed listing catalog using sqlx connection pool.
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Connect to the PostgreSQL database at database_url.
    ///
    /// If run_migrations is true, automatically runs pending migrations on startup.
    pub async fn new(database_url: &str, run_migrations: bool) -> Result<Self, MarketError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(1800))
            .connect(database_url)
            .await
            .map_err(|e| MarketError::Storage(format!("Failed to connect to database: {}", e)))?;

        if run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| MarketError::Storage(format!("Migration failed: {}", e)))?;
        }

        Ok(PostgresCatalog { pool })
    }
}

/// Map a sqlx PgRow from the listings/categories join to a Listing.
fn row_to_listing(row: &PgRow) -> Result<Listing, MarketError> {
    Ok(Listing {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        location: row.try_get("location")?,
        condition: row.try_get("condition")?,
        price_cents: row.try_get("price_cents")?,
        seller_id: row.try_get("seller_id")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CatalogProvider for PostgresCatalog {
    async fn all_listings(&self) -> Result<Vec<Listing>, MarketError> {
        let sql = format!(
            "SELECT {} FROM listings l \
             LEFT JOIN categories c ON c.id = l.category_id \
             ORDER BY l.created_at DESC, l.id DESC",
            LISTING_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| MarketError::CatalogUnavailable(format!("Failed to load listings: {}", e)))?;

        let listings = rows.iter().map(row_to_listing).collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = listings.len(), "Catalog loaded from PostgreSQL");
        Ok(listings)
    }

    async fn listing(&self, id: i64) -> Result<Listing, MarketError> {
        let sql = format!(
            "SELECT {} FROM listings l \
             LEFT JOIN categories c ON c.id = l.category_id \
             WHERE l.id = $1",
            LISTING_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| MarketError::NotFound { id: id.to_string() })?;

        row_to_listing(&row)
    }

    async fn categories(&self) -> Result<Vec<Category>, MarketError> {
        let rows = sqlx::query("SELECT id, name, parent_id FROM categories ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            categories.push(Category {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                parent_id: row.try_get("parent_id")?,
            });
        }
        Ok(categories)
    }
}
