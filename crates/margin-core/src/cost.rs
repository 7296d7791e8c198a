//! # Cost Aggregator
//!
//! Combines a product's cost components into the landed cost every channel
//! calculation starts from.
//!
//! ```text
//! item_cost ──┐
//!             ├──► total_cost (landed cost) ──► every channel
//! packaging ──┘
//!
//! tax_percent ───────────────────────────────► applied per channel
//! ```
//!
//! Tax is kept apart from `total_cost`: the calculator applies it as its
//! own step so the tax basis is decided in exactly one place.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Percent;
use crate::validation::{validate_amount, validate_percent, ValidationResult};

/// Landed cost of one unit: item cost plus packaging.
///
/// Negative inputs are rejected.
pub fn landed_cost(item_cost: Money, packaging_cost: Money) -> ValidationResult<Money> {
    validate_amount(item_cost, "itemCost")?;
    validate_amount(packaging_cost, "packagingCost")?;
    Ok(item_cost + packaging_cost)
}

/// Immutable cost snapshot used as calculation input.
///
/// Fields are private so a `ProductCost` only exists in a validated state.
/// Deserialization goes through the same checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", try_from = "RawProductCost")]
pub struct ProductCost {
    item_cost: Money,
    packaging_cost: Money,
    tax_percent: Percent,
}

impl ProductCost {
    /// Creates a validated cost snapshot.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::{Money, Percent, ProductCost};
    ///
    /// let cost = ProductCost::new(
    ///     Money::from_cents(4500),
    ///     Money::from_cents(500),
    ///     Percent::from_whole(10),
    /// ).unwrap();
    /// assert_eq!(cost.total_cost().cents(), 5000);
    /// ```
    pub fn new(
        item_cost: Money,
        packaging_cost: Money,
        tax_percent: Percent,
    ) -> ValidationResult<Self> {
        landed_cost(item_cost, packaging_cost)?;
        validate_percent(tax_percent, "taxPercent")?;
        Ok(ProductCost {
            item_cost,
            packaging_cost,
            tax_percent,
        })
    }

    /// A zero cost with zero tax.
    pub const fn zero() -> Self {
        ProductCost {
            item_cost: Money::zero(),
            packaging_cost: Money::zero(),
            tax_percent: Percent::zero(),
        }
    }

    #[inline]
    pub const fn item_cost(&self) -> Money {
        self.item_cost
    }

    #[inline]
    pub const fn packaging_cost(&self) -> Money {
        self.packaging_cost
    }

    #[inline]
    pub const fn tax_percent(&self) -> Percent {
        self.tax_percent
    }

    /// `item_cost + packaging_cost`. Tax is not included.
    #[inline]
    pub fn total_cost(&self) -> Money {
        self.item_cost + self.packaging_cost
    }
}

impl Default for ProductCost {
    fn default() -> Self {
        ProductCost::zero()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductCost {
    item_cost: Money,
    packaging_cost: Money,
    tax_percent: Percent,
}

impl TryFrom<RawProductCost> for ProductCost {
    type Error = crate::error::ValidationError;

    fn try_from(raw: RawProductCost) -> Result<Self, Self::Error> {
        ProductCost::new(raw.item_cost, raw.packaging_cost, raw.tax_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_landed_cost() {
        let total = landed_cost(Money::from_cents(4500), Money::from_cents(500)).unwrap();
        assert_eq!(total.cents(), 5000);
        assert_eq!(landed_cost(Money::zero(), Money::zero()).unwrap(), Money::zero());
    }

    #[test]
    fn test_landed_cost_rejects_negative() {
        assert_eq!(
            landed_cost(Money::from_cents(-1), Money::zero()),
            Err(ValidationError::negative("itemCost"))
        );
        assert_eq!(
            landed_cost(Money::zero(), Money::from_cents(-1)),
            Err(ValidationError::negative("packagingCost"))
        );
    }

    #[test]
    fn test_product_cost_excludes_tax_from_total() {
        let cost = ProductCost::new(
            Money::from_cents(5000),
            Money::zero(),
            Percent::from_whole(10),
        )
        .unwrap();
        assert_eq!(cost.total_cost().cents(), 5000);
        assert_eq!(cost.tax_percent().bps(), 1000);
    }

    #[test]
    fn test_product_cost_rejects_negative_tax() {
        assert_eq!(
            ProductCost::new(Money::zero(), Money::zero(), Percent::from_bps(-100)),
            Err(ValidationError::negative("taxPercent"))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: ProductCost =
            serde_json::from_str(r#"{"itemCost":4500,"packagingCost":500,"taxPercent":1000}"#)
                .unwrap();
        assert_eq!(ok.total_cost().cents(), 5000);

        let bad = serde_json::from_str::<ProductCost>(
            r#"{"itemCost":-1,"packagingCost":500,"taxPercent":1000}"#,
        );
        assert!(bad.is_err());
    }
}
