/// Catalog search service
///
/// Glues a CatalogProvider to the RankingPipeline: fetch the full catalog once per
/// request, then rank it synchronously. A failed fetch is the only way a search can
/// fail, and it is reported once for the whole request as CatalogUnavailable.

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::CatalogProvider;
use crate::config::Config;
use crate::errors::MarketError;
use crate::search::pipeline::{RankingPipeline, SearchPage, SearchRequest};
use crate::search::scorer::ListingScorer;

pub struct SearchService {
    catalog: Arc<dyn CatalogProvider + Send + Sync>,
    pipeline: RankingPipeline,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogProvider + Send + Sync>, pipeline: RankingPipeline) -> Self {
        SearchService { catalog, pipeline }
    }

    /// Build the service with weights and request defaults from configuration.
    pub fn from_config(catalog: Arc<dyn CatalogProvider + Send + Sync>, config: &Config) -> Self {
        let pipeline = RankingPipeline::new(
            ListingScorer::new(config.scoring.clone()),
            config.search.clone(),
        );
        SearchService::new(catalog, pipeline)
    }

    pub fn catalog(&self) -> &Arc<dyn CatalogProvider + Send + Sync> {
        &self.catalog
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchPage, MarketError> {
        let started = Instant::now();

        let listings = self.catalog.all_listings().await.map_err(|e| {
            tracing::error!(error = %e, "Catalog fetch failed");
            match e {
                MarketError::CatalogUnavailable(msg) => MarketError::CatalogUnavailable(msg),
                other => MarketError::CatalogUnavailable(other.to_string()),
            }
        })?;

        let page = self.pipeline.search(&listings, request);

        tracing::info!(
            query = %request.query,
            category = ?request.category_id,
            catalog_size = listings.len(),
            total = page.total,
            page = page.page,
            limit = page.limit,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Listing};
    use async_trait::async_trait;

    struct FailingCatalog;

    #[async_trait]
    impl CatalogProvider for FailingCatalog {
        async fn all_listings(&self) -> Result<Vec<Listing>, MarketError> {
            Err(MarketError::Storage("connection refused".to_string()))
        }

        async fn listing(&self, id: i64) -> Result<Listing, MarketError> {
            Err(MarketError::NotFound { id: id.to_string() })
        }

        async fn categories(&self) -> Result<Vec<Category>, MarketError> {
            Ok(Vec::new())
        }
    }

    struct FixedCatalog(Vec<Listing>);

    #[async_trait]
    impl CatalogProvider for FixedCatalog {
        async fn all_listings(&self) -> Result<Vec<Listing>, MarketError> {
            Ok(self.0.clone())
        }

        async fn listing(&self, id: i64) -> Result<Listing, MarketError> {
            self.0
                .iter()
                .find(|l| l.id == id)
                .cloned()
                .ok_or_else(|| MarketError::NotFound { id: id.to_string() })
        }

        async fn categories(&self) -> Result<Vec<Category>, MarketError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_catalog_unavailable() {
        let service = SearchService::from_config(Arc::new(FailingCatalog), &Config::default());
        match service.search(&SearchRequest::new("laptop")).await {
            Err(MarketError::CatalogUnavailable(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("expected CatalogUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_is_empty_page() {
        let service = SearchService::from_config(Arc::new(FixedCatalog(Vec::new())), &Config::default());
        let page = service.search(&SearchRequest::new("laptop")).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.listings.is_empty());
    }

    #[tokio::test]
    async fn test_search_uses_configured_weights() {
        let catalog = vec![Listing {
            id: 1,
            location: Some("Madrid".to_string()),
            ..Default::default()
        }];
        let mut config = Config::default();
        let default_service = SearchService::from_config(Arc::new(FixedCatalog(catalog.clone())), &config);
        // Location weight 0.8 keeps an exact location hit under a 0.9 threshold
        let request = SearchRequest {
            threshold: Some(0.9),
            ..SearchRequest::new("madrid")
        };
        assert_eq!(default_service.search(&request).await.unwrap().total, 0);

        config.scoring.location = 1.0;
        let tuned = SearchService::from_config(Arc::new(FixedCatalog(catalog)), &config);
        assert_eq!(tuned.search(&request).await.unwrap().total, 1);
    }
}
