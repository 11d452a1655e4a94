//! Batch match pipeline
//!
//! Sequences per-item matching across a whole BOM. Items run concurrently
//! up to a bounded worker pool; output order is input order. One item's
//! failure never aborts the run — except an auth failure, after which no
//! further query can succeed.

use crate::cancel::CancelToken;
use crate::summary::{BatchOutcome, BatchSummary};
use bommatch_api_client::{ApiError, ApiResult, CatalogSearch, SearchPage, SearchQuery};
use bommatch_core::rate_limit::RateLimitConfig;
use bommatch_core::retry::RetryConfig;
use bommatch_model::{BomItem, Confidence, MatchCandidate, MatchMethod, MatchResult};
use bommatch_search::{normalize, FuzzyMatcher, MatcherConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

/// Fatal batch failures
#[derive(Debug, Error)]
pub enum BatchError {
    /// Credentials were rejected; the whole run stops immediately
    #[error("batch aborted, catalog authentication failed: {0}")]
    Auth(ApiError),
}

/// Tuning for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Concurrent items in flight
    pub max_in_flight: usize,
    /// Per-item retry policy for transient search failures
    pub retry: RetryConfig,
    /// Matcher thresholds and limits
    pub matcher: MatcherConfig,
    /// Candidates fetched per search
    pub search_page_size: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 4,
            retry: RetryConfig::default(),
            matcher: MatcherConfig::default(),
            search_page_size: 10,
        }
    }
}

impl BatchConfig {
    /// Size the worker pool from the provider's rate limit so in-flight
    /// requests stay inside the quota
    #[must_use]
    pub fn for_rate_limit(mut self, rate_limit: &RateLimitConfig) -> Self {
        self.max_in_flight = rate_limit.suggested_concurrency();
        self
    }
}

/// Runs a whole BOM through search and fuzzy matching.
///
/// Generic over [`CatalogSearch`] so tests can drive it with an in-memory
/// catalog.
pub struct BatchOrchestrator<C: CatalogSearch + 'static> {
    client: Arc<C>,
    matcher: FuzzyMatcher,
    config: BatchConfig,
}

impl<C: CatalogSearch + 'static> BatchOrchestrator<C> {
    /// Create an orchestrator over the given catalog client
    pub fn new(client: C, config: BatchConfig) -> Self {
        Self {
            client: Arc::new(client),
            matcher: FuzzyMatcher::new(config.matcher.clone()),
            config,
        }
    }

    /// Match every BOM item, in input order.
    ///
    /// The output has one result per item unless the run is cancelled, in
    /// which case the completed prefix of work is returned with
    /// `truncated` set. Cancellation is checked between items only.
    pub async fn run(
        &self,
        items: Vec<BomItem>,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome, BatchError> {
        let total = items.len();
        info!(
            items = total,
            max_in_flight = self.config.max_in_flight,
            "starting batch match"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight.max(1)));
        // Flipped by the first worker that sees an auth failure so queued
        // items stop before issuing doomed requests
        let abort = CancelToken::new();
        let cache: MatchCache = Arc::new(Mutex::new(HashMap::new()));

        let mut handles = Vec::with_capacity(total);
        for item in items.iter().cloned() {
            let client = Arc::clone(&self.client);
            let matcher = self.matcher.clone();
            let retry = self.config.retry.clone();
            let page_size = self.config.search_page_size;
            let semaphore = Arc::clone(&semaphore);
            let cache = Arc::clone(&cache);
            let cancel = cancel.clone();
            let abort = abort.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return ItemOutcome::Skipped;
                };
                // Cancellation boundary: before an item starts, never mid-item
                if cancel.is_cancelled() || abort.is_cancelled() {
                    return ItemOutcome::Skipped;
                }
                let outcome =
                    process_item(client, matcher, retry, page_size, cache, item).await;
                if matches!(outcome, ItemOutcome::AuthFailed(_)) {
                    abort.cancel();
                }
                outcome
            }));
        }

        let mut results = Vec::with_capacity(total);
        let mut truncated = false;
        let mut auth_error: Option<ApiError> = None;

        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(ItemOutcome::Done(result)) => results.push(*result),
                Ok(ItemOutcome::Skipped) => truncated = true,
                Ok(ItemOutcome::AuthFailed(e)) => {
                    if auth_error.is_none() {
                        auth_error = Some(e);
                    }
                }
                Err(join_error) => {
                    warn!(row = index, error = %join_error, "batch worker failed");
                    results.push(MatchResult::errored(
                        items[index].clone(),
                        format!("worker failed: {join_error}"),
                    ));
                }
            }
        }

        if let Some(e) = auth_error {
            return Err(BatchError::Auth(e));
        }

        let mut summary = BatchSummary::new();
        for result in &results {
            summary.record(result);
        }

        info!(
            matched_high = summary.matched_high,
            matched_medium = summary.matched_medium,
            matched_low = summary.matched_low,
            unmatched = summary.unmatched,
            errored = summary.errored,
            truncated,
            "batch match complete"
        );

        Ok(BatchOutcome {
            results,
            summary,
            truncated,
        })
    }
}

type MatchCache = Arc<Mutex<HashMap<String, CachedOutcome>>>;

/// What one worker hands back to the collector
enum ItemOutcome {
    Done(Box<MatchResult>),
    Skipped,
    AuthFailed(ApiError),
}

impl ItemOutcome {
    fn done(result: MatchResult) -> Self {
        Self::Done(Box::new(result))
    }
}

/// A finished match, minus the BOM row it gets attached to.
///
/// Duplicate part names within one run reuse this instead of re-querying
/// the provider.
#[derive(Debug, Clone)]
struct CachedOutcome {
    best_candidate: Option<MatchCandidate>,
    alternatives: Vec<MatchCandidate>,
    method: MatchMethod,
}

impl CachedOutcome {
    fn from_ranked(mut ranked: Vec<MatchCandidate>, max_alternatives: usize) -> Self {
        if ranked.is_empty() {
            return Self {
                best_candidate: None,
                alternatives: Vec::new(),
                method: MatchMethod::Unmatched,
            };
        }
        let best = ranked.remove(0);
        ranked.truncate(max_alternatives);
        let method = if best.score >= 100.0 {
            MatchMethod::Exact
        } else {
            MatchMethod::Fuzzy
        };
        Self {
            best_candidate: Some(best),
            alternatives: ranked,
            method,
        }
    }

    fn apply(&self, item: BomItem) -> MatchResult {
        match &self.best_candidate {
            Some(best) => MatchResult::matched(
                item,
                best.clone(),
                self.alternatives.clone(),
                self.method,
            ),
            None => MatchResult::unmatched(item),
        }
    }
}

/// Match one BOM row end to end
async fn process_item<C: CatalogSearch>(
    client: Arc<C>,
    matcher: FuzzyMatcher,
    retry: RetryConfig,
    page_size: u32,
    cache: MatchCache,
    item: BomItem,
) -> ItemOutcome {
    if let Err(e) = item.validate() {
        debug!(row = item.row_index, error = %e, "skipping malformed BOM row");
        return ItemOutcome::done(MatchResult::errored(
            item,
            format!("validation failed: {e}"),
        ));
    }

    let cache_key = normalize(&item.stock_part_name);
    if let Some(cached) = cache.lock().await.get(&cache_key).cloned() {
        debug!(row = item.row_index, "match cache hit");
        return ItemOutcome::done(cached.apply(item));
    }

    // Primary search by the full part name
    let page = match search_with_retry(&*client, &retry, &item.stock_part_name, page_size).await
    {
        Ok(page) => page,
        Err(e) if e.is_auth() => return ItemOutcome::AuthFailed(e),
        Err(e) => {
            warn!(row = item.row_index, error = %e, "primary search failed");
            return ItemOutcome::done(MatchResult::errored(
                item,
                format!("search failed: {e}"),
            ));
        }
    };

    let mut ranked = matcher.rank(&item.stock_part_name, &page.items);

    // Secondary search by MPN alone, only when the primary outcome is weak
    if needs_fallback(&ranked) {
        if let Some(mpn) = item.mpn.clone() {
            match search_with_retry(&*client, &retry, &mpn, page_size).await {
                Ok(fallback_page) => {
                    let fallback_ranked = matcher.rank(&mpn, &fallback_page.items);
                    if best_score(&fallback_ranked) > best_score(&ranked) {
                        debug!(row = item.row_index, "MPN fallback outranked primary search");
                        ranked = fallback_ranked;
                    }
                }
                Err(e) if e.is_auth() => return ItemOutcome::AuthFailed(e),
                Err(e) => {
                    // Best effort; the primary outcome stands
                    warn!(row = item.row_index, error = %e, "MPN fallback search failed");
                }
            }
        }
    }

    let outcome = CachedOutcome::from_ranked(ranked, matcher.config().max_alternatives);
    cache.lock().await.insert(cache_key, outcome.clone());
    ItemOutcome::done(outcome.apply(item))
}

fn needs_fallback(ranked: &[MatchCandidate]) -> bool {
    match ranked.first() {
        None => true,
        Some(best) => Confidence::of(best.score) == Confidence::Low,
    }
}

fn best_score(ranked: &[MatchCandidate]) -> f64 {
    ranked.first().map_or(0.0, |c| c.score)
}

/// Bounded retry around one search; backoff sleeps are async so other
/// in-flight items keep moving
async fn search_with_retry<C: CatalogSearch>(
    client: &C,
    retry: &RetryConfig,
    keyword: &str,
    page_size: u32,
) -> ApiResult<SearchPage> {
    let query = SearchQuery::new(keyword).with_page_size(page_size);
    let mut last_error: Option<ApiError> = None;

    for attempt in 0..retry.max_attempts {
        if attempt > 0 {
            tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
        }

        match client.search(&query).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && retry.should_retry(attempt) => {
                debug!(keyword, attempt = attempt + 1, error = %e, "transient search failure");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(ApiError::RetriesExhausted {
        attempts: retry.max_attempts,
        last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
    })
}
