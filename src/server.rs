use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

use crate::catalog::{Category, Listing};
use crate::errors::MarketError;
use crate::search::{MatchStrategy, SearchRequest, SearchService};

/// Total match count for a search, sent alongside the page body.
pub const X_TOTAL_COUNT: &str = "x-total-count";

#[derive(Clone)]
pub struct AppState {
    search: Arc<SearchService>,
    start_time: Instant,
}

impl AppState {
    pub fn new(search: Arc<SearchService>) -> Self {
        Self {
            search,
            start_time: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/listings/search", get(search_listings))
        .route("/api/listings/:id", get(get_listing))
        .route("/api/categories", get(list_categories))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query-string parameters exactly as sent.
///
/// Everything is taken as text so that `page=abc` falls back to a default
/// instead of failing extraction with a 400. A repeated key keeps its first value.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub threshold: Option<String>,
    /// "fuzzy" (default) or "exact"
    pub mode: Option<String>,
}

impl SearchParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "category" => &mut params.category,
                "threshold" => &mut params.threshold,
                "mode" => &mut params.mode,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

fn parse_lenient<T: FromStr>(value: &Option<String>) -> Option<T> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        SearchRequest {
            page: parse_lenient(&params.page),
            limit: parse_lenient(&params.limit),
            category_id: parse_lenient(&params.category),
            threshold: parse_lenient(&params.threshold),
            strategy: params.mode.as_deref().and_then(|m| MatchStrategy::from_str(m).ok()),
            query: params.q.unwrap_or_default(),
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        let status = match &self {
            MarketError::Validation { .. } => StatusCode::BAD_REQUEST,
            MarketError::NotFound { .. } => StatusCode::NOT_FOUND,
            MarketError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MarketError::Config(_) | MarketError::Internal(_) | MarketError::Storage(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        if let MarketError::Validation { field: Some(field), .. } = &self {
            error["field"] = json!(field);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

async fn search_listings(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, MarketError> {
    let request = SearchRequest::from(SearchParams::from_pairs(pairs));
    tracing::info!(
        query = %request.query,
        page = ?request.page,
        limit = ?request.limit,
        category = ?request.category_id,
        "Search requested"
    );

    let page = state.search.search(&request).await?;

    Ok((
        [
            (HeaderName::from_static(X_TOTAL_COUNT), page.total.to_string()),
            (header::ACCESS_CONTROL_EXPOSE_HEADERS, X_TOTAL_COUNT.to_string()),
        ],
        Json(page.listings),
    )
        .into_response())
}

async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, MarketError> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| MarketError::validation("id", "Listing id must be an integer"))?;

    let listing = state.search.catalog().listing(id).await?;
    Ok(Json(listing))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, MarketError> {
    let categories = state.search.catalog().categories().await?;
    Ok(Json(categories))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Bind and serve until ctrl-c.
pub async fn serve(bind_addr: &str, search: Arc<SearchService>) -> anyhow::Result<()> {
    let app = router(AppState::new(search));
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse_leniently() {
        let params = SearchParams {
            q: Some("bike".to_string()),
            page: Some("abc".to_string()),
            limit: Some(" 20 ".to_string()),
            category: Some("x".to_string()),
            threshold: Some("0.75".to_string()),
            mode: Some("exact".to_string()),
        };
        let request = SearchRequest::from(params);
        assert_eq!(request.query, "bike");
        assert_eq!(request.page, None);
        assert_eq!(request.limit, Some(20));
        assert_eq!(request.category_id, None);
        assert_eq!(request.threshold, Some(0.75));
        assert_eq!(request.strategy, Some(MatchStrategy::ExactSubstring));
    }

    #[test]
    fn test_repeated_key_keeps_first_value() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("page".to_string(), "5".to_string()),
            ("q".to_string(), "sofa".to_string()),
            ("sort".to_string(), "price".to_string()),
        ];
        let request = SearchRequest::from(SearchParams::from_pairs(pairs));
        assert_eq!(request.page, Some(2));
        assert_eq!(request.query, "sofa");
    }

    #[test]
    fn test_missing_params_default() {
        let request = SearchRequest::from(SearchParams::default());
        assert_eq!(request.query, "");
        assert_eq!(request.strategy, None);
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (MarketError::validation("id", "bad"), StatusCode::BAD_REQUEST),
            (MarketError::NotFound { id: "1".to_string() }, StatusCode::NOT_FOUND),
            (MarketError::CatalogUnavailable("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (MarketError::Storage("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
