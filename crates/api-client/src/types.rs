//! Search request/response types and the provider wire format
//!
//! The wire structs mirror the provider's JSON verbatim and are converted
//! into validated [`CatalogItem`]s at the boundary, so nothing past this
//! module ever sees raw provider data.

use crate::error::{ApiError, ApiResult};
use bigdecimal::BigDecimal;
use bommatch_model::{CatalogItem, PriceTier};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Optional constraints on a search
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Only return items with stock on the shelf
    pub in_stock_only: bool,
    /// Include parts flagged as pre-sale
    pub include_pre_sale: bool,
}

/// One keyword search against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keyword(s); empty browses the whole catalog
    pub keyword: String,
    /// Page number, 1-based
    pub page: u32,
    /// Results per page
    pub page_size: u32,
    /// Optional constraints
    pub filters: SearchFilters,
}

impl SearchQuery {
    /// Create a query for the first page with the default page size
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 1,
            page_size: 30,
            filters: SearchFilters::default(),
        }
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the filters
    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Check the query is within the search contract
    pub fn validate(&self) -> ApiResult<()> {
        if self.page == 0 {
            return Err(ApiError::invalid_query("page must be at least 1"));
        }
        if self.page_size == 0 || self.page_size > crate::config::MAX_PAGE_SIZE {
            return Err(ApiError::invalid_query(format!(
                "page_size must be in 1..={}",
                crate::config::MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

/// One page of search results
///
/// Ordering is provider-defined; the client does no ranking. A search with
/// no hits is a success with zero items.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Items on this page
    pub items: Vec<CatalogItem>,
    /// Total matching items across all pages
    pub total_count: u64,
}

impl SearchPage {
    /// A page with no results
    pub fn empty() -> Self {
        Self::default()
    }
}

// ============================================================================
// Provider wire format
// ============================================================================

/// Provider response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: Option<String>,
    pub result: Option<T>,
}

/// Search result payload inside the envelope
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireSearchResult {
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "productList")]
    pub product_list: Vec<WireProduct>,
}

/// One product as the provider ships it
#[derive(Debug, Deserialize)]
pub(crate) struct WireProduct {
    #[serde(rename = "productCode")]
    pub product_code: String,
    #[serde(default, rename = "productModel")]
    pub product_model: String,
    #[serde(default, rename = "brandNameEn")]
    pub brand_name: String,
    #[serde(default, rename = "productIntroEn")]
    pub description: String,
    #[serde(default, rename = "encapStandard")]
    pub package: String,
    #[serde(default, rename = "stockNumber")]
    pub stock: u32,
    #[serde(default, rename = "productPriceList")]
    pub price_list: Vec<WirePriceTier>,
    #[serde(default, rename = "pdfUrl")]
    pub datasheet_url: Option<String>,
    #[serde(default, rename = "isPresale")]
    pub pre_sale: bool,
}

/// One price break as the provider ships it
#[derive(Debug, Deserialize)]
pub(crate) struct WirePriceTier {
    #[serde(rename = "startAmount")]
    pub start_amount: u32,
    #[serde(rename = "productPrice")]
    pub product_price: BigDecimal,
}

impl WireProduct {
    /// Convert into a validated catalog item.
    ///
    /// Providers occasionally ship tier lists unsorted or with duplicate
    /// quantity breaks; both are repaired here (sort, keep the first entry
    /// per break) before the strict constructor runs.
    pub(crate) fn into_item(self) -> ApiResult<CatalogItem> {
        let mut raw_tiers = self.price_list;
        raw_tiers.sort_by_key(|tier| tier.start_amount);
        raw_tiers.dedup_by_key(|tier| tier.start_amount);

        let mut tiers = Vec::with_capacity(raw_tiers.len());
        for tier in raw_tiers {
            match PriceTier::new(tier.start_amount, tier.product_price) {
                Ok(tier) => tiers.push(tier),
                Err(e) => {
                    warn!(item = %self.product_code, error = %e, "dropping malformed price tier");
                }
            }
        }

        let mut item = CatalogItem::new(
            self.product_code,
            self.product_model,
            self.brand_name,
            self.description,
            self.package,
            self.stock,
            tiers,
        )?
        .with_pre_sale(self.pre_sale);

        if let Some(url) = self.datasheet_url {
            if !url.is_empty() {
                item = item.with_datasheet_url(url);
            }
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_query_validation() {
        assert!(SearchQuery::new("resistor").validate().is_ok());
        assert!(SearchQuery::new("resistor").with_page(0).validate().is_err());
        assert!(SearchQuery::new("resistor").with_page_size(0).validate().is_err());
        assert!(SearchQuery::new("resistor").with_page_size(1001).validate().is_err());
        assert!(SearchQuery::new("resistor").with_page_size(1000).validate().is_ok());
    }

    #[test]
    fn test_wire_product_parses_provider_payload() {
        let json = r#"{
            "productCode": "C25804",
            "productModel": "0603WAF1002T5E",
            "brandNameEn": "UNI-ROYAL",
            "productIntroEn": "10kΩ ±1% 0603 chip resistor",
            "encapStandard": "0603",
            "stockNumber": 52000,
            "productPriceList": [
                {"startAmount": 1, "productPrice": 0.10},
                {"startAmount": 100, "productPrice": 0.08},
                {"startAmount": 1000, "productPrice": 0.05}
            ],
            "pdfUrl": "https://datasheet.example.com/C25804.pdf",
            "isPresale": false
        }"#;

        let wire: WireProduct = serde_json::from_str(json).unwrap();
        let item = wire.into_item().unwrap();

        assert_eq!(item.id, "C25804");
        assert_eq!(item.brand, "UNI-ROYAL");
        assert_eq!(item.stock, 52000);
        assert_eq!(item.price_tiers().len(), 3);
        assert_eq!(
            item.best_bulk_price(),
            Some(&BigDecimal::from_str("0.05").unwrap())
        );
        assert!(item.datasheet_url.is_some());
    }

    #[test]
    fn test_wire_product_missing_fields_default() {
        let json = r#"{"productCode": "C1"}"#;

        let wire: WireProduct = serde_json::from_str(json).unwrap();
        let item = wire.into_item().unwrap();

        assert_eq!(item.id, "C1");
        assert_eq!(item.stock, 0);
        assert!(item.best_bulk_price().is_none());
    }

    #[test]
    fn test_wire_product_repairs_unsorted_tiers() {
        let json = r#"{
            "productCode": "C2",
            "productPriceList": [
                {"startAmount": 1000, "productPrice": 0.05},
                {"startAmount": 1, "productPrice": 0.10},
                {"startAmount": 1, "productPrice": 0.12}
            ]
        }"#;

        let wire: WireProduct = serde_json::from_str(json).unwrap();
        let item = wire.into_item().unwrap();

        let breaks: Vec<u32> = item.price_tiers().iter().map(|t| t.min_qty).collect();
        assert_eq!(breaks, vec![1, 1000]);
    }

    #[test]
    fn test_envelope_failure_shape() {
        let json = r#"{"success": false, "code": 430, "message": "bad key"}"#;
        let envelope: Envelope<WireSearchResult> = serde_json::from_str(json).unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.code, 430);
        assert!(envelope.result.is_none());
    }
}
