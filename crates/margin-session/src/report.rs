//! # Pricing Report
//!
//! Serializable snapshot of a session: the comparison plus, for every
//! enabled channel, the break-even price and the price that reaches the
//! target margin. Also builds quotes for a bare cost across all channel
//! types at their default fees.

use serde::Serialize;

use margin_core::{
    break_even_price, create_default_channel, price_for_target_margin, ChannelComparison,
    ChannelFees, ChannelType, Money, Percent, ProductCost,
};

use crate::error::SessionResult;
use crate::manager::ChannelManager;

/// Price points of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// `None` when percentage fees take the whole price.
    pub break_even_price: Option<Money>,
    pub target_margin: Percent,
    /// `None` when the target is unreachable.
    pub target_price: Option<Money>,
}

impl PriceSuggestion {
    fn for_fees(
        channel_type: ChannelType,
        cost: &ProductCost,
        fees: &ChannelFees,
        target_margin: Percent,
    ) -> SessionResult<Self> {
        Ok(PriceSuggestion {
            channel_type,
            break_even_price: break_even_price(cost.total_cost(), cost.tax_percent(), fees)?,
            target_margin,
            target_price: price_for_target_margin(
                cost.total_cost(),
                cost.tax_percent(),
                fees,
                target_margin,
            )?,
        })
    }
}

/// Report of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingReport {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub cost: ProductCost,
    pub comparison: ChannelComparison,
    pub suggestions: Vec<PriceSuggestion>,
}

/// Builds the report of an open session.
pub fn build_report(manager: &mut ChannelManager, target_margin: Percent) -> SessionResult<PricingReport> {
    let comparison = manager.recompute()?;
    let cost = *manager.cost();

    let suggestions = manager
        .enabled_channels()
        .map(|c| PriceSuggestion::for_fees(c.channel_type, &cost, &c.fees, target_margin))
        .collect::<SessionResult<Vec<_>>>()?;

    Ok(PricingReport {
        product_id: manager.product_id().to_string(),
        sku: manager.sku().to_string(),
        name: manager.name().to_string(),
        cost,
        comparison,
        suggestions,
    })
}

/// Suggested prices on every channel type at its default fees.
pub fn quote(cost: &ProductCost, target_margin: Percent) -> SessionResult<Vec<PriceSuggestion>> {
    ChannelType::ALL
        .into_iter()
        .map(|t| {
            let channel = create_default_channel(t);
            PriceSuggestion::for_fees(t, cost, &channel.fees, target_margin)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use margin_core::ProductPricing;

    fn cost() -> ProductCost {
        ProductCost::new(Money::from_cents(4000), Money::zero(), Percent::zero()).unwrap()
    }

    #[test]
    fn test_quote_covers_every_channel() {
        let quotes = quote(&cost(), Percent::from_whole(20)).unwrap();
        assert_eq!(quotes.len(), ChannelType::ALL.len());

        // No fees on the own site: 40.00 / 0.80 = 50.00, break-even at cost.
        let site = &quotes[0];
        assert_eq!(site.channel_type, ChannelType::SiteProprio);
        assert_eq!(site.break_even_price, Some(Money::from_cents(4000)));
        assert_eq!(site.target_price, Some(Money::from_cents(5000)));

        for q in &quotes {
            assert!(q.target_price >= q.break_even_price);
        }
    }

    #[test]
    fn test_report_lists_enabled_channels_only() {
        let mut site = create_default_channel(ChannelType::SiteProprio);
        site.enabled = true;
        site.selling_price = Money::from_cents(6000);

        let mut m = ChannelManager::new(ProductPricing {
            product_id: "p".to_string(),
            sku: "SKU".to_string(),
            name: "Produto".to_string(),
            cost: cost(),
            channels: vec![site],
            updated_at: Utc::now(),
        })
        .unwrap();

        let report = build_report(&mut m, Percent::from_whole(20)).unwrap();
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.comparison.best_channel, Some(ChannelType::SiteProprio));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["suggestions"][0]["type"], "SITE_PROPRIO");
        assert_eq!(json["suggestions"][0]["targetPrice"], 5000);
    }
}
