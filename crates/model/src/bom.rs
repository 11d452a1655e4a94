//! BOM line items
//!
//! A BOM row is immutable once loaded; the quantity drives bulk-price
//! lookups downstream.

use bommatch_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// One line of a Bill of Materials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomItem {
    /// Zero-based row index in the source document
    pub row_index: usize,
    /// Free-text part name as it appears in the BOM (required)
    pub stock_part_name: String,
    /// Units needed per assembly
    pub quantity: u32,
    /// Reference designators (e.g. "R1, R2, R14")
    pub reference_designator: String,
    /// Manufacturer part number, when the BOM carries one
    pub mpn: Option<String>,
    /// Manufacturer name, when the BOM carries one
    pub manufacturer: Option<String>,
}

impl BomItem {
    /// Create a BOM item with the required fields
    pub fn new(row_index: usize, stock_part_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            row_index,
            stock_part_name: stock_part_name.into(),
            quantity,
            reference_designator: String::new(),
            mpn: None,
            manufacturer: None,
        }
    }

    /// Set the reference designators
    #[must_use]
    pub fn with_reference(mut self, designator: impl Into<String>) -> Self {
        self.reference_designator = designator.into();
        self
    }

    /// Set the manufacturer part number
    #[must_use]
    pub fn with_mpn(mut self, mpn: impl Into<String>) -> Self {
        self.mpn = Some(mpn.into());
        self
    }

    /// Set the manufacturer name
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Check the row is well-formed enough to match.
    ///
    /// Malformed rows are skipped by the batch orchestrator, never fatal.
    pub fn validate(&self) -> Result<()> {
        if self.stock_part_name.trim().is_empty() {
            return Err(Error::invalid_input("stock_part_name", "must not be empty")
                .with_context(format!("BOM row {}", self.row_index)));
        }
        if self.quantity == 0 {
            return Err(Error::invalid_input("quantity", "must be at least 1")
                .with_context(format!("BOM row {}", self.row_index)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_item() {
        let item = BomItem::new(0, "10K resistor 0603", 100)
            .with_reference("R1, R2")
            .with_mpn("0603WAF1002T5E");
        assert!(item.validate().is_ok());
        assert_eq!(item.mpn.as_deref(), Some("0603WAF1002T5E"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let item = BomItem::new(3, "   ", 10);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let item = BomItem::new(3, "100nF cap", 0);
        assert!(item.validate().is_err());
    }
}
