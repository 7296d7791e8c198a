//! # Multi-Channel Aggregator
//!
//! Runs the channel calculator over every enabled channel of a product and
//! builds the comparison shown on the pricing screen.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  channels[] ──► filter enabled ──► calculate_channel() each            │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                        results: ChannelType → PricingCalculation        │
//! │                                        │                                │
//! │          ┌──────────────┬──────────────┼───────────────┐               │
//! │          ▼              ▼              ▼               ▼               │
//! │     best_channel   worst_channel   counts      margin_distribution     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-Breaks
//! - best: highest net profit → lowest channel costs → enumeration order
//! - worst: lowest net profit → highest channel costs → enumeration order
//!
//! Results live in a `BTreeMap` keyed by `ChannelType`, so iteration order,
//! and therefore every selection, never depends on input order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calculator::{calculate_channel, PricingCalculation};
use crate::cost::ProductCost;
use crate::error::ValidationError;
use crate::money::{self, Money};
use crate::types::{ChannelType, Percent, SalesChannel};
use crate::validation::{validate_amount, validate_percent, ValidationResult};

// =============================================================================
// Margin Bands
// =============================================================================

/// Coarse margin classification used for the distribution summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginBand {
    /// Margin below 0%.
    Loss,
    /// 0% up to (not including) 10%.
    Thin,
    /// 10% up to (not including) 25%.
    Healthy,
    /// 25% and above.
    Strong,
}

impl MarginBand {
    pub const THIN_FROM: Percent = Percent::from_bps(0);
    pub const HEALTHY_FROM: Percent = Percent::from_bps(1_000);
    pub const STRONG_FROM: Percent = Percent::from_bps(2_500);

    /// Band of a margin percentage.
    pub fn of(margin: Percent) -> Self {
        if margin < Self::THIN_FROM {
            MarginBand::Loss
        } else if margin < Self::HEALTHY_FROM {
            MarginBand::Thin
        } else if margin < Self::STRONG_FROM {
            MarginBand::Healthy
        } else {
            MarginBand::Strong
        }
    }
}

// =============================================================================
// Channel Comparison
// =============================================================================

/// Cross-channel view of one product.
///
/// An empty comparison (no enabled channels) is a valid, displayable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChannelComparison {
    /// One entry per enabled channel.
    pub results: BTreeMap<ChannelType, PricingCalculation>,
    pub best_channel: Option<ChannelType>,
    pub worst_channel: Option<ChannelType>,
    pub profitable_count: usize,
    /// Number of enabled channels.
    pub total_channel_count: usize,
    pub margin_distribution: BTreeMap<MarginBand, usize>,
    /// Mean of the enabled channels' margins; zero with no channels.
    pub average_margin_percent: Percent,
}

impl ChannelComparison {
    /// Calculation of the best channel.
    pub fn best(&self) -> Option<&PricingCalculation> {
        self.best_channel.and_then(|t| self.results.get(&t))
    }

    /// Calculation of the worst channel.
    pub fn worst(&self) -> Option<&PricingCalculation> {
        self.worst_channel.and_then(|t| self.results.get(&t))
    }

    /// True when no channel is enabled.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn unprofitable_count(&self) -> usize {
        self.total_channel_count - self.profitable_count
    }

    /// Profitable channels in enumeration order.
    pub fn profitable_channels(&self) -> impl Iterator<Item = &PricingCalculation> {
        self.results.values().filter(|c| c.is_profitable)
    }
}

/// `Greater` when `a` is the better channel.
fn rank_best(a: &PricingCalculation, b: &PricingCalculation) -> Ordering {
    a.net_profit
        .cmp(&b.net_profit)
        .then_with(|| b.total_channel_costs.cmp(&a.total_channel_costs))
        .then_with(|| b.channel_type.cmp(&a.channel_type))
}

/// `Less` when `a` is the worse channel.
fn rank_worst(a: &PricingCalculation, b: &PricingCalculation) -> Ordering {
    a.net_profit
        .cmp(&b.net_profit)
        .then_with(|| b.total_channel_costs.cmp(&a.total_channel_costs))
        .then_with(|| a.channel_type.cmp(&b.channel_type))
}

// =============================================================================
// Aggregation
// =============================================================================

/// Computes every enabled channel and compares them.
///
/// ## Errors
/// - `ValidationError::DuplicateChannel` if a channel type appears twice
/// - any validation error of an enabled channel; it is raised, never skipped,
///   so a bad input cannot silently change which channel looks best
///
/// Disabled channels are neither computed nor validated.
///
/// ## Example
/// ```rust
/// use margin_core::aggregator::calculate_all_channels;
/// use margin_core::fees::create_default_channel;
/// use margin_core::{ChannelType, Money, Percent};
///
/// let mut site = create_default_channel(ChannelType::SiteProprio);
/// site.enabled = true;
/// site.selling_price = Money::from_cents(9900);
/// let fba = create_default_channel(ChannelType::AmazonFba); // disabled
///
/// let cmp = calculate_all_channels(Money::from_cents(5000), Percent::zero(), &[site, fba]).unwrap();
/// assert_eq!(cmp.total_channel_count, 1);
/// assert_eq!(cmp.best_channel, Some(ChannelType::SiteProprio));
/// ```
pub fn calculate_all_channels(
    total_cost: Money,
    tax_percent: Percent,
    channels: &[SalesChannel],
) -> ValidationResult<ChannelComparison> {
    validate_amount(total_cost, "totalCost")?;
    validate_percent(tax_percent, "taxPercent")?;

    let mut seen = [false; ChannelType::ALL.len()];
    for channel in channels {
        let slot = &mut seen[channel.channel_type.ordinal()];
        if *slot {
            return Err(ValidationError::DuplicateChannel(channel.channel_type));
        }
        *slot = true;
    }

    let mut results = BTreeMap::new();
    for channel in channels.iter().filter(|c| c.enabled) {
        let calculation = calculate_channel(total_cost, tax_percent, channel)?;
        results.insert(channel.channel_type, calculation);
    }

    let best_channel = results
        .values()
        .max_by(|a, b| rank_best(a, b))
        .map(|c| c.channel_type);
    let worst_channel = results
        .values()
        .min_by(|a, b| rank_worst(a, b))
        .map(|c| c.channel_type);

    let profitable_count = results.values().filter(|c| c.is_profitable).count();
    let total_channel_count = results.len();

    let mut margin_distribution = BTreeMap::new();
    for calculation in results.values() {
        *margin_distribution
            .entry(MarginBand::of(calculation.profit_margin_percent))
            .or_insert(0) += 1;
    }

    let average_margin_percent = if results.is_empty() {
        Percent::zero()
    } else {
        let sum: i128 = results
            .values()
            .map(|c| c.profit_margin_percent.bps() as i128)
            .sum();
        Percent::from_bps(money::div_round_half_away(sum, results.len() as i128) as i64)
    };

    Ok(ChannelComparison {
        results,
        best_channel,
        worst_channel,
        profitable_count,
        total_channel_count,
        margin_distribution,
        average_margin_percent,
    })
}

/// [`calculate_all_channels`] with the landed cost and tax taken from a
/// [`ProductCost`].
pub fn calculate_for_product(
    cost: &ProductCost,
    channels: &[SalesChannel],
) -> ValidationResult<ChannelComparison> {
    calculate_all_channels(cost.total_cost(), cost.tax_percent(), channels)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::{create_default_channel, ensure_all_channels};
    use crate::types::ChannelFees;

    fn enabled(channel_type: ChannelType, price_cents: i64, commission: i64) -> SalesChannel {
        let mut channel = create_default_channel(channel_type);
        channel.enabled = true;
        channel.selling_price = Money::from_cents(price_cents);
        channel.fees = ChannelFees {
            commission_percent: Percent::from_whole(commission),
            ..Default::default()
        };
        channel
    }

    fn cost() -> ProductCost {
        ProductCost::new(Money::from_cents(5000), Money::zero(), Percent::from_whole(10)).unwrap()
    }

    #[test]
    fn test_empty_when_nothing_enabled() {
        let channels = ensure_all_channels(Vec::new()).unwrap();
        let cmp = calculate_for_product(&cost(), &channels).unwrap();

        assert!(cmp.is_empty());
        assert_eq!(cmp.best_channel, None);
        assert_eq!(cmp.worst_channel, None);
        assert_eq!(cmp.profitable_count, 0);
        assert_eq!(cmp.total_channel_count, 0);
        assert_eq!(cmp.average_margin_percent, Percent::zero());
        assert!(cmp.margin_distribution.is_empty());
    }

    #[test]
    fn test_disabled_channels_are_excluded() {
        let mut off = enabled(ChannelType::Shopee, 20_000, 20);
        off.enabled = false;
        let on = enabled(ChannelType::SiteProprio, 9000, 0);

        let cmp = calculate_for_product(&cost(), &[off, on]).unwrap();
        assert_eq!(cmp.results.len(), 1);
        assert!(cmp.results.contains_key(&ChannelType::SiteProprio));
        assert!(!cmp.results.contains_key(&ChannelType::Shopee));
    }

    #[test]
    fn test_best_and_worst() {
        let channels = vec![
            enabled(ChannelType::SiteProprio, 4000, 0),   // net -15.00
            enabled(ChannelType::AmazonFbm, 15_000, 15),  // net 72.50
            enabled(ChannelType::Shopee, 12_000, 20),     // net 41.00
        ];
        let cmp = calculate_for_product(&cost(), &channels).unwrap();

        assert_eq!(cmp.best_channel, Some(ChannelType::AmazonFbm));
        assert_eq!(cmp.worst_channel, Some(ChannelType::SiteProprio));
        assert_eq!(cmp.profitable_count, 2);
        assert_eq!(cmp.unprofitable_count(), 1);
        assert_eq!(cmp.total_channel_count, 3);

        let best = cmp.best().unwrap();
        for calc in cmp.results.values() {
            assert!(best.net_profit >= calc.net_profit);
            assert!(cmp.worst().unwrap().net_profit <= calc.net_profit);
        }
    }

    #[test]
    fn test_tie_resolved_by_enumeration_order() {
        // Same price and fees on two channels: equal net and equal costs.
        let shopee = enabled(ChannelType::Shopee, 15_000, 15);
        let fba = enabled(ChannelType::AmazonFba, 15_000, 15);

        let forward = calculate_for_product(&cost(), &[shopee.clone(), fba.clone()]).unwrap();
        let reverse = calculate_for_product(&cost(), &[fba, shopee]).unwrap();

        let a = &forward.results[&ChannelType::Shopee];
        let b = &forward.results[&ChannelType::AmazonFba];
        assert_eq!(a.net_profit, b.net_profit);
        assert_eq!(a.total_channel_costs, b.total_channel_costs);

        assert_eq!(forward.best_channel, Some(ChannelType::AmazonFba));
        assert_eq!(forward.worst_channel, Some(ChannelType::AmazonFba));
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_tie_on_net_prefers_lower_costs_for_best() {
        // Site: price 100, no fees. Marketplace: price 110, 10.00 fixed fee.
        // Both net 45.00, marketplace carries 10.00 of channel costs.
        let site = enabled(ChannelType::SiteProprio, 10_000, 0);
        let mut market = enabled(ChannelType::Marketplace, 11_000, 0);
        market.fees.fixed_fee = Money::from_cents(1000);

        let cmp = calculate_for_product(&cost(), &[market, site]).unwrap();
        assert_eq!(
            cmp.results[&ChannelType::SiteProprio].net_profit,
            cmp.results[&ChannelType::Marketplace].net_profit
        );
        assert_eq!(cmp.best_channel, Some(ChannelType::SiteProprio));
        assert_eq!(cmp.worst_channel, Some(ChannelType::Marketplace));
    }

    #[test]
    fn test_margin_distribution_and_average() {
        let channels = vec![
            enabled(ChannelType::SiteProprio, 4000, 0),  // -37.50%
            enabled(ChannelType::AmazonFbm, 6000, 0),    // 8.33%
            enabled(ChannelType::AmazonDba, 7000, 0),    // 21.43%
            enabled(ChannelType::AmazonFba, 10_000, 0),  // 45.00%
        ];
        let cmp = calculate_for_product(&cost(), &channels).unwrap();

        assert_eq!(cmp.margin_distribution[&MarginBand::Loss], 1);
        assert_eq!(cmp.margin_distribution[&MarginBand::Thin], 1);
        assert_eq!(cmp.margin_distribution[&MarginBand::Healthy], 1);
        assert_eq!(cmp.margin_distribution[&MarginBand::Strong], 1);

        // (-3750 + 833 + 2143 + 4500) / 4 = 931.5 → 932
        assert_eq!(cmp.average_margin_percent.bps(), 932);
    }

    #[test]
    fn test_margin_band_boundaries() {
        assert_eq!(MarginBand::of(Percent::from_bps(-1)), MarginBand::Loss);
        assert_eq!(MarginBand::of(Percent::zero()), MarginBand::Thin);
        assert_eq!(MarginBand::of(Percent::from_bps(999)), MarginBand::Thin);
        assert_eq!(MarginBand::of(Percent::from_bps(1000)), MarginBand::Healthy);
        assert_eq!(MarginBand::of(Percent::from_bps(2500)), MarginBand::Strong);
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let a = enabled(ChannelType::Shopee, 1000, 0);
        let mut b = a.clone();
        b.enabled = false;
        assert_eq!(
            calculate_for_product(&cost(), &[a, b]),
            Err(ValidationError::DuplicateChannel(ChannelType::Shopee))
        );
    }

    #[test]
    fn test_invalid_enabled_channel_raises() {
        let good = enabled(ChannelType::SiteProprio, 9000, 0);
        let mut bad = enabled(ChannelType::AmazonFbm, 9000, 15);
        bad.fees.shipping_cost = Money::from_cents(-1);

        assert_eq!(
            calculate_for_product(&cost(), &[good, bad]),
            Err(ValidationError::negative("shippingCost"))
        );
    }

    #[test]
    fn test_idempotent() {
        let channels = vec![
            enabled(ChannelType::MercadoLivreFull, 8990, 17),
            enabled(ChannelType::MercadoLivreClassico, 8990, 12),
        ];
        let first = calculate_for_product(&cost(), &channels).unwrap();
        let second = calculate_for_product(&cost(), &channels).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
