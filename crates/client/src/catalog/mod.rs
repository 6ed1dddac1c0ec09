//! Commerce catalog API client.
//!
//! Read-only access to the backend's storefront product endpoints, with a
//! 5-minute `moka` cache over listings and single products so scrolling back
//! through the product list does not refetch every page.

mod cache;
pub mod types;

pub use types::{Product, ProductListPage, ProductListParams, ProductPrice, ProductVariant};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use sundrop_core::ProductId;

use crate::config::CommerceConfig;

use cache::{CacheKey, CacheValue};

/// Errors from the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend asked us to back off.
    #[error("catalog rate limited, retry after {0}s")]
    RateLimited(u64),

    /// Unknown product id.
    #[error("product not found: {0}")]
    NotFound(String),

    /// Non-success response from the backend.
    #[error("catalog returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading bytes of the response body.
        body: String,
    },

    /// The response body did not parse.
    #[error("failed to parse catalog response: {0}")]
    Parse(#[from] serde_json::Error),
}

// Single products are wrapped in an envelope on the wire.
#[derive(Deserialize)]
struct ProductEnvelope {
    product: Product,
}

/// Client for the commerce catalog API.
///
/// Cheaply cloneable; listings and products are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    publishable_key: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client sharing the given HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &CommerceConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                publishable_key: config.publishable_key.clone(),
                cache,
            }),
        }
    }

    /// Execute a GET against a storefront endpoint and parse the response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/store/{path}", self.inner.base_url);

        let response = self
            .inner
            .client
            .get(&url)
            .header("x-publishable-api-key", &self.inner.publishable_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_owned()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Fetch one page of the product listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on transport, status, or parse failures.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        params: &ProductListParams,
    ) -> Result<ProductListPage, CatalogError> {
        let key = CacheKey::Products {
            limit: params.limit,
            offset: params.offset,
            query: params.q.clone(),
        };
        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&key).await {
            debug!("catalog listing cache hit");
            return Ok(page);
        }

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = params.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(q) = &params.q {
            query.push(("q", q.clone()));
        }

        let page: ProductListPage = self.get_json("products", &query).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Products(page.clone()))
            .await;
        Ok(page)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for unknown ids, and transport,
    /// status, or parse failures otherwise.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id.as_str().to_owned());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("catalog product cache hit");
            return Ok(*product);
        }

        let envelope: ProductEnvelope =
            self.get_json(&format!("products/{id}"), &[]).await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(envelope.product.clone())))
            .await;
        Ok(envelope.product)
    }
}
