//! Batch match orchestration for bommatch
//!
//! Takes a whole BOM and drives it through catalog search and fuzzy
//! matching:
//!
//! - Bounded concurrency sized from the provider's rate limit
//! - Per-item bounded retry with async backoff
//! - Secondary MPN search when the primary outcome is weak
//! - Cooperative cancellation between items
//! - Confidence-band reporting with no silent drops
//!
//! # Example
//!
//! ```rust,no_run
//! use bommatch_api_client::CatalogClient;
//! use bommatch_model::BomItem;
//! use bommatch_orchestrator::{BatchConfig, BatchOrchestrator, CancelToken};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new()?;
//! let orchestrator = BatchOrchestrator::new(client, BatchConfig::default());
//!
//! let items = vec![BomItem::new(0, "10k resistor 0603", 100)];
//! let outcome = orchestrator.run(items, &CancelToken::new()).await?;
//! println!("{} high-confidence matches", outcome.summary.matched_high);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod batch;
mod cancel;
mod summary;

pub use batch::{BatchConfig, BatchError, BatchOrchestrator};
pub use cancel::CancelToken;
pub use summary::{BatchOutcome, BatchSummary};
