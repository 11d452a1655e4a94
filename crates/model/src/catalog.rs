//! Catalog items and tiered bulk pricing
//!
//! Items come back from the catalog provider as read-only views. The
//! constructor validates the tier-ordering invariant up front so the rest of
//! the pipeline never has to re-check it.

use bigdecimal::BigDecimal;
use bommatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A (minimum quantity, unit price) breakpoint for bulk pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Minimum order quantity at which this price applies
    pub min_qty: u32,
    /// Unit price at this quantity break
    pub unit_price: BigDecimal,
}

impl PriceTier {
    /// Create a tier, rejecting a zero quantity break
    pub fn new(min_qty: u32, unit_price: BigDecimal) -> Result<Self> {
        if min_qty == 0 {
            return Err(Error::validation("price tier min_qty must be at least 1"));
        }
        if unit_price < BigDecimal::from(0) {
            return Err(Error::validation(format!(
                "negative unit price {} at quantity break {}",
                unit_price, min_qty
            )));
        }
        Ok(Self { min_qty, unit_price })
    }
}

/// A part in the component catalog
///
/// Instances are produced by the query client and treated as immutable by
/// the matcher. `price_tiers` is kept private so the ascending-quantity
/// invariant established in [`CatalogItem::new`] cannot be broken later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Provider part number, unique within the catalog
    pub id: String,
    /// Manufacturer model / MPN
    pub model: String,
    /// Manufacturer brand name
    pub brand: String,
    /// Free-text description
    pub description: String,
    /// Package code (e.g. 0603, SOT-23)
    pub package: String,
    /// Units currently in stock
    pub stock: u32,
    /// Datasheet link, when the provider has one
    pub datasheet_url: Option<String>,
    /// Provider flags this part as pre-sale
    pub pre_sale: bool,
    price_tiers: Vec<PriceTier>,
    discount_violation: bool,
}

impl CatalogItem {
    /// Construct an item, validating the price-tier invariants.
    ///
    /// Tiers must be strictly increasing in `min_qty`; a violation is a hard
    /// error. A price that rises as quantity increases breaks bulk-discount
    /// monotonicity; providers do ship such data occasionally, so it is
    /// tolerated but flagged and logged.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        model: impl Into<String>,
        brand: impl Into<String>,
        description: impl Into<String>,
        package: impl Into<String>,
        stock: u32,
        price_tiers: Vec<PriceTier>,
    ) -> Result<Self> {
        let id = id.into();

        for pair in price_tiers.windows(2) {
            if pair[1].min_qty <= pair[0].min_qty {
                return Err(Error::validation(format!(
                    "price tiers must be strictly increasing in min_qty \
                     ({} followed by {})",
                    pair[0].min_qty, pair[1].min_qty
                ))
                .with_context(format!("While constructing catalog item {}", id)));
            }
        }

        let discount_violation = price_tiers
            .windows(2)
            .any(|pair| pair[1].unit_price > pair[0].unit_price);
        if discount_violation {
            warn!(item = %id, "price tiers violate bulk-discount monotonicity");
        }

        Ok(Self {
            id,
            model: model.into(),
            brand: brand.into(),
            description: description.into(),
            package: package.into(),
            stock,
            datasheet_url: None,
            pre_sale: false,
            price_tiers,
            discount_violation,
        })
    }

    /// Attach a datasheet link
    #[must_use]
    pub fn with_datasheet_url(mut self, url: impl Into<String>) -> Self {
        self.datasheet_url = Some(url.into());
        self
    }

    /// Mark the item as pre-sale
    #[must_use]
    pub fn with_pre_sale(mut self, pre_sale: bool) -> Self {
        self.pre_sale = pre_sale;
        self
    }

    /// Price tiers, ascending by quantity break
    pub fn price_tiers(&self) -> &[PriceTier] {
        &self.price_tiers
    }

    /// Whether the provider's pricing rises with quantity anywhere
    pub fn has_discount_violation(&self) -> bool {
        self.discount_violation
    }

    /// Unit price applicable when ordering `qty` units.
    ///
    /// Picks the highest tier whose quantity break is at or below `qty`.
    /// Quantities below the first break clamp to the first tier; quantities
    /// above the last break clamp to the last. Never extrapolates. `None`
    /// when the item has no pricing at all.
    pub fn unit_price_at(&self, qty: u32) -> Option<&BigDecimal> {
        let applicable = self
            .price_tiers
            .iter()
            .rev()
            .find(|tier| tier.min_qty <= qty);

        match applicable {
            Some(tier) => Some(&tier.unit_price),
            None => self.price_tiers.first().map(|tier| &tier.unit_price),
        }
    }

    /// Unit price at the largest quantity break — the cheapest the part
    /// gets. This is the default ranking key when no target quantity is
    /// known. `None` when the item has no pricing; unpriced items sort
    /// after every priced one.
    pub fn best_bulk_price(&self) -> Option<&BigDecimal> {
        self.price_tiers.last().map(|tier| &tier.unit_price)
    }

    /// Whether any units are on the shelf
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The text the fuzzy matcher runs against: model, description, and
    /// brand concatenated. Package codes usually ride along inside the
    /// description and stay matchable.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.model, self.description, self.brand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn tier(min_qty: u32, price: &str) -> PriceTier {
        PriceTier::new(min_qty, BigDecimal::from_str(price).unwrap()).unwrap()
    }

    fn resistor(tiers: Vec<PriceTier>) -> CatalogItem {
        CatalogItem::new(
            "C25804",
            "0603WAF1002T5E",
            "UNI-ROYAL",
            "10kΩ ±1% 0603 chip resistor",
            "0603",
            52000,
            tiers,
        )
        .unwrap()
    }

    #[test]
    fn test_tier_rejects_zero_qty() {
        assert!(PriceTier::new(0, BigDecimal::from(1)).is_err());
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let result = CatalogItem::new(
            "C1",
            "m",
            "b",
            "d",
            "0402",
            0,
            vec![tier(100, "0.08"), tier(1, "0.10")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_tier_qty_rejected() {
        let result = CatalogItem::new(
            "C1",
            "m",
            "b",
            "d",
            "0402",
            0,
            vec![tier(10, "0.08"), tier(10, "0.07")],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rising_price_flagged_not_rejected() {
        let item = CatalogItem::new(
            "C2",
            "m",
            "b",
            "d",
            "0402",
            0,
            vec![tier(1, "0.05"), tier(100, "0.09")],
        )
        .unwrap();
        assert!(item.has_discount_violation());
    }

    #[test]
    fn test_unit_price_clamps_both_ends() {
        let item = resistor(vec![tier(10, "0.10"), tier(100, "0.08"), tier(1000, "0.05")]);

        // Below the first break: clamp to the first tier
        assert_eq!(item.unit_price_at(1), Some(&BigDecimal::from_str("0.10").unwrap()));
        // Exactly on a break
        assert_eq!(item.unit_price_at(100), Some(&BigDecimal::from_str("0.08").unwrap()));
        // Between breaks: highest tier at or below
        assert_eq!(item.unit_price_at(999), Some(&BigDecimal::from_str("0.08").unwrap()));
        // Above the last break: clamp to the last tier
        assert_eq!(item.unit_price_at(50_000), Some(&BigDecimal::from_str("0.05").unwrap()));
    }

    #[test]
    fn test_unit_price_monotone_non_increasing() {
        let item = resistor(vec![tier(1, "0.10"), tier(100, "0.08"), tier(1000, "0.05")]);

        let mut previous: Option<BigDecimal> = None;
        for qty in [1u32, 5, 50, 100, 500, 1000, 10_000] {
            let price = item.unit_price_at(qty).cloned().unwrap();
            if let Some(prev) = previous {
                assert!(price <= prev, "price rose between quantities");
            }
            previous = Some(price);
        }
    }

    #[test]
    fn test_best_bulk_price_is_last_tier() {
        let item = resistor(vec![tier(1, "0.10"), tier(100, "0.08"), tier(1000, "0.05")]);
        assert_eq!(
            item.best_bulk_price(),
            Some(&BigDecimal::from_str("0.05").unwrap())
        );
    }

    #[test]
    fn test_empty_tiers_price_undefined() {
        let item = resistor(vec![]);
        assert!(item.unit_price_at(100).is_none());
        assert!(item.best_bulk_price().is_none());
    }

    #[test]
    fn test_in_stock() {
        let item = resistor(vec![]);
        assert!(item.in_stock());
    }

    #[test]
    fn test_item_deserializes_with_tiers_intact() {
        let item = resistor(vec![tier(1, "0.10"), tier(1000, "0.05")]);
        let json = serde_json::to_string(&item).unwrap();
        let back: CatalogItem = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, item.id);
        assert_eq!(back.price_tiers(), item.price_tiers());
        assert_eq!(back.best_bulk_price(), item.best_bulk_price());
    }

    #[test]
    fn test_searchable_text_includes_all_fields() {
        let item = resistor(vec![]);
        let text = item.searchable_text();
        assert!(text.contains("0603WAF1002T5E"));
        assert!(text.contains("UNI-ROYAL"));
        assert!(text.contains("chip resistor"));
    }
}
