//! Meal catalog: the remote listing API and the view that loads it.
//!
//! # Remote API
//!
//! A single `GET` to a fixed URL (TheMealDB's category filter by default)
//! returning:
//!
//! ```json
//! { "meals": [ { "idMeal": "52819", "strMeal": "...", "strMealThumb": "..." } ] }
//! ```
//!
//! `"meals": null` (or a missing `meals` field) means there is nothing to
//! show and is reported as [`CatalogError::NoProducts`]. An empty array is
//! a valid, empty listing.
//!
//! # Caching
//!
//! The last good listing is kept in a `moka` cache for five minutes, so a
//! view that is mounted again does not hit the API again.

mod view;

pub use view::{CatalogView, LoadState};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mealcart_core::Product;
use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::CatalogConfig;

/// Inline text shown when the API reports no meals.
pub const NO_PRODUCTS_MESSAGE: &str = "No products found.";

/// Inline text shown when the API call fails.
pub const FETCH_FAILED_MESSAGE: &str = "Error fetching products.";

const CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API returned status {status}")]
    Status { status: u16 },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API returned no usable list.
    #[error("no meals in response")]
    NoProducts,
}

impl CatalogError {
    /// Text the listing shows in place of the products.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NoProducts => NO_PRODUCTS_MESSAGE,
            Self::Http(_) | Self::Status { .. } | Self::Parse(_) => FETCH_FAILED_MESSAGE,
        }
    }
}

/// Wire shape of the listing response.
#[derive(Debug, Deserialize)]
struct MealsResponse {
    #[serde(default)]
    meals: Option<Vec<Product>>,
}

/// Decode a listing response body.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] for malformed JSON and
/// [`CatalogError::NoProducts`] when `meals` is `null` or missing.
pub fn parse_listing(body: &str) -> Result<Vec<Product>, CatalogError> {
    let response: MealsResponse = serde_json::from_str(body)?;
    response.meals.ok_or(CatalogError::NoProducts)
}

/// Anything that can produce the product listing.
///
/// Implemented by [`CatalogClient`]; tests substitute canned sources.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the full listing.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Client for the remote meal listing.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: config.url.clone(),
                cache,
            }),
        })
    }

    /// The listing URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch the listing, serving a cached copy when one is fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, the body is malformed, or it holds no meals.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let key = self.inner.endpoint.to_string();
        if let Some(cached) = self.inner.cache.get(&key).await {
            tracing::debug!(count = cached.len(), "Catalog served from cache");
            return Ok(cached.as_ref().clone());
        }

        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let products = parse_listing(&body).inspect_err(|e| {
            tracing::warn!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog response had no usable listing"
            );
        })?;

        tracing::info!(count = products.len(), "Catalog fetched");
        self.inner
            .cache
            .insert(key, Arc::new(products.clone()))
            .await;
        Ok(products)
    }
}

impl CatalogSource for CatalogClient {
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
        self.products()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, extract::State, http::StatusCode, routing::get};

    use super::*;

    const SEAFOOD: &str = r#"{"meals":[
        {"strMeal":"Baked salmon with fennel & tomatoes","strMealThumb":"https://www.themealdb.com/images/media/meals/1548772327.jpg","idMeal":"52959"},
        {"strMeal":"Cajun spiced fish tacos","strMealThumb":"https://www.themealdb.com/images/media/meals/uvuyxu1503067369.jpg","idMeal":"52819"}
    ]}"#;

    #[derive(Clone)]
    struct Canned {
        status: StatusCode,
        body: &'static str,
        hits: Arc<AtomicUsize>,
    }

    async fn serve(canned: Canned) -> Url {
        async fn handler(State(canned): State<Canned>) -> (StatusCode, &'static str) {
            canned.hits.fetch_add(1, Ordering::SeqCst);
            (canned.status, canned.body)
        }

        let app = Router::new()
            .route("/api/json/v1/1/filter.php", get(handler))
            .with_state(canned);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{addr}/api/json/v1/1/filter.php?c=Seafood")).unwrap()
    }

    fn client_for(url: Url) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_listing() {
        let products = parse_listing(SEAFOOD).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].display_name, "Cajun spiced fish tacos");
    }

    #[test]
    fn test_parse_listing_null_and_missing_meals() {
        assert!(matches!(
            parse_listing(r#"{"meals":null}"#),
            Err(CatalogError::NoProducts)
        ));
        assert!(matches!(parse_listing("{}"), Err(CatalogError::NoProducts)));
    }

    #[test]
    fn test_parse_listing_empty_array_is_ok() {
        assert!(parse_listing(r#"{"meals":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(CatalogError::NoProducts.user_message(), "No products found.");
        assert_eq!(
            CatalogError::Status { status: 500 }.user_message(),
            "Error fetching products."
        );
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            CatalogError::Parse(parse).user_message(),
            "Error fetching products."
        );
    }

    #[tokio::test]
    async fn test_client_fetches_and_caches() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve(Canned {
            status: StatusCode::OK,
            body: SEAFOOD,
            hits: Arc::clone(&hits),
        })
        .await;
        let client = client_for(url);

        let first = client.products().await.unwrap();
        let second = client.products().await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_reports_status_errors() {
        let url = serve(Canned {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "oops",
            hits: Arc::new(AtomicUsize::new(0)),
        })
        .await;

        let err = client_for(url).products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_client_null_meals_is_not_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = serve(Canned {
            status: StatusCode::OK,
            body: r#"{"meals":null}"#,
            hits: Arc::clone(&hits),
        })
        .await;
        let client = client_for(url);

        assert!(matches!(
            client.products().await,
            Err(CatalogError::NoProducts)
        ));
        assert!(client.products().await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_unreachable_host_is_http_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/filter.php")).unwrap();
        let err = client_for(url).products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
        assert_eq!(err.user_message(), "Error fetching products.");
    }
}
