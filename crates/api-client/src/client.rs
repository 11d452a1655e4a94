//! Catalog client implementation

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::types::{Envelope, SearchPage, SearchQuery, WireSearchResult};
use bommatch_core::rate_limit::RateLimiter;
use bommatch_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// API key header expected by the catalog provider
const API_KEY_HEADER: &str = "X-API-KEY";

/// Rate-limiter bucket for search calls
const SEARCH_BUCKET: &str = "search";

/// The provider boundary: one keyword search per call.
///
/// The orchestrator is generic over this trait so batch runs can be tested
/// against in-memory catalogs. Implementations perform no ranking; result
/// ordering is provider-defined.
pub trait CatalogSearch: Send + Sync {
    /// Issue a single search and return one page of candidates.
    ///
    /// Zero hits is a success with an empty page, not an error.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = ApiResult<SearchPage>> + Send;
}

/// Catalog API client with built-in resilience patterns
///
/// Wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - Circuit breaker to stop hammering a failing provider
/// - Rate limiting to stay inside the provider quota
/// - Request correlation IDs for tracing
///
/// Transport-level request signing is the provider SDK's job; this client
/// only carries the credentials and reacts to auth failures.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
    rate_limiter: Arc<RateLimiter>,
}

impl CatalogClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("bommatch-api-client/0.3"),
        );

        if let Some(ref key) = config.api_key {
            if let Ok(value) = HeaderValue::from_str(key) {
                default_headers.insert(API_KEY_HEADER, value);
            }
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default()));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker,
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Reset the circuit breaker
    pub fn reset_circuit(&self) {
        self.circuit_breaker.reset();
    }

    /// Check reachability and credentials with a minimal search
    pub async fn test_connection(&self) -> bool {
        let probe = SearchQuery::new("test").with_page_size(1);
        self.search_page(&probe).await.is_ok()
    }

    /// Execute a search with full resilience patterns
    #[instrument(skip(self), fields(request_id))]
    async fn search_page(&self, query: &SearchQuery) -> ApiResult<SearchPage> {
        query.validate()?;

        let request_id = Uuid::new_v4().to_string();

        // Oversized pages are clamped to the provider profile, not rejected
        let page_size = query.page_size.min(self.config.max_page_size);
        if page_size != query.page_size {
            debug!(
                request_id = %request_id,
                requested = query.page_size,
                clamped = page_size,
                "page_size exceeds provider profile, clamping"
            );
        }

        if !self.circuit_breaker.can_execute() {
            warn!(
                request_id = %request_id,
                keyword = %query.keyword,
                "Circuit breaker is open, rejecting request"
            );
            return Err(ApiError::CircuitOpen);
        }

        if !self.rate_limiter.try_acquire(SEARCH_BUCKET) {
            warn!(
                request_id = %request_id,
                keyword = %query.keyword,
                "Rate limited"
            );
            return Err(ApiError::RateLimited);
        }

        self.execute_with_retry(&request_id, query, page_size).await
    }

    /// Execute request with retry logic
    async fn execute_with_retry(
        &self,
        request_id: &str,
        query: &SearchQuery,
        page_size: u32,
    ) -> ApiResult<SearchPage> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(request_id, query, page_size)
                .await;
            let elapsed = start.elapsed();

            match result {
                Ok(page) => {
                    self.circuit_breaker.record_success();
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        items = page.items.len(),
                        total = page.total_count,
                        "Search succeeded"
                    );
                    return Ok(page);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();

                    if e.is_retryable() && attempt + 1 < retry_config.max_attempts {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Search failed, will retry"
                        );
                        last_error = Some(e);
                    } else {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Search failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single search request without retry
    async fn execute_single_request(
        &self,
        request_id: &str,
        query: &SearchQuery,
        page_size: u32,
    ) -> ApiResult<SearchPage> {
        let url = format!(
            "{}/products/search",
            self.config.base_url.trim_end_matches('/')
        );

        let params = [
            ("keyword", query.keyword.clone()),
            ("current_page", query.page.to_string()),
            ("page_size", page_size.to_string()),
            ("is_available", query.filters.in_stock_only.to_string()),
            ("is_pre_sale", query.filters.include_pre_sale.to_string()),
        ];

        let response = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, request_id)
            .query(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Decode the provider envelope and build the result page
    async fn handle_response(&self, response: Response) -> ApiResult<SearchPage> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::api_response(status.as_u16(), message));
        }

        let envelope: Envelope<WireSearchResult> =
            response.json().await.map_err(ApiError::Request)?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown provider error".to_string());
            return Err(ApiError::from_provider_code(envelope.code, message));
        }

        let result = envelope.result.unwrap_or_default();
        let total_count = result.total;

        let mut items = Vec::with_capacity(result.product_list.len());
        for product in result.product_list {
            match product.into_item() {
                Ok(item) => items.push(item),
                Err(e) => {
                    // One unparseable product must not sink the page
                    warn!(error = %e, "skipping malformed catalog item");
                }
            }
        }

        Ok(SearchPage { items, total_count })
    }
}

impl CatalogSearch for CatalogClient {
    async fn search(&self, query: &SearchQuery) -> ApiResult<SearchPage> {
        self.search_page(query).await
    }
}
