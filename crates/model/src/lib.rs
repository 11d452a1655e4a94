//! Domain data model for bommatch
//!
//! This crate holds the types that flow between the query client, the fuzzy
//! matcher, and the batch orchestrator:
//!
//! - [`CatalogItem`] / [`PriceTier`]: read-only catalog views with validated
//!   tier ordering and the price/stock normalizer
//! - [`BomItem`]: one immutable BOM row
//! - [`MatchCandidate`] / [`MatchResult`] / [`Confidence`]: matcher output
//!   consumed by export and UI collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod bom;
mod catalog;
mod matching;

pub use bom::BomItem;
pub use catalog::{CatalogItem, PriceTier};
pub use matching::{Confidence, MatchCandidate, MatchMethod, MatchResult, MatchedField};
