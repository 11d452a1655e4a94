//! Catalog provider client for bommatch
//!
//! The single boundary to the remote component catalog: keyword search with
//! paged results. Authentication signing and transport details beyond
//! timeouts live with the provider SDK; this crate reacts to three
//! outcomes — success, transient failure (retryable), and auth failure
//! (fatal).
//!
//! # Example
//!
//! ```rust,no_run
//! use bommatch_api_client::{CatalogClient, CatalogSearch, SearchQuery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new()?;
//! let page = client.search(&SearchQuery::new("10k resistor 0603")).await?;
//! println!("{} of {} candidates", page.items.len(), page.total_count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod config;
mod error;
mod types;

pub use client::{CatalogClient, CatalogSearch};
pub use config::{ClientConfig, Environment, MAX_PAGE_SIZE};
pub use error::{ApiError, ApiResult, PROVIDER_CODE_AUTH, PROVIDER_CODES_RATE_LIMIT};
pub use types::{SearchFilters, SearchPage, SearchQuery};
