//! # Channel Calculator
//!
//! Profitability of one product on one channel.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate_channel(total_cost, tax_percent, channel)                    │
//! │                                                                         │
//! │   2. commission   = price × commission%        (rounded to the cent)   │
//! │   3. advertising  = price × advertising%       (rounded to the cent)   │
//! │   4. fulfillment  = fees.fulfillment_fee                               │
//! │   5. shipping     = fees.shipping_cost                                 │
//! │   6. fixed        = fees.fixed_fee                                     │
//! │   7. other        = fees.other_fees                                    │
//! │   8. channel costs = 2 + 6 + 5 + 4 + 3 + 7                             │
//! │   9. tax          = total_cost × tax%          (rounded to the cent)   │
//! │  10. gross        = price − total_cost − tax                           │
//! │  11. net          = gross − channel costs                              │
//! │  12. margin       = net / price × 100          (0 when price = 0)      │
//! │  13. markup = roi = net / total_cost × 100     (0 when cost = 0)       │
//! │  14. profitable   = net > 0                                            │
//! │  15. competitive  = no competitor price, or price ≤ competitor         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is charged on the landed cost, not on the selling price.
//!
//! `enabled` is not looked at: a disabled channel computes the same numbers.
//! Filtering disabled channels is the aggregator's job.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ChannelFees, ChannelType, Percent, SalesChannel};
use crate::validation::{
    validate_amount, validate_channel_numbers, validate_fees, validate_percent, ValidationResult,
};

// =============================================================================
// Result Types
// =============================================================================

/// Where the selling price sits relative to the channel's price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricePosition {
    /// No bounds configured.
    Unbounded,
    BelowMin,
    WithinRange,
    AboveMax,
}

impl PricePosition {
    /// Classifies `price` against optional `min` / `max`.
    pub fn classify(price: Money, min: Option<Money>, max: Option<Money>) -> Self {
        match (min, max) {
            (None, None) => PricePosition::Unbounded,
            (Some(min), _) if price < min => PricePosition::BelowMin,
            (_, Some(max)) if price > max => PricePosition::AboveMax,
            _ => PricePosition::WithinRange,
        }
    }
}

/// Profitability of one channel. Derived output, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalculation {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub channel_name: String,
    pub selling_price: Money,
    pub total_cost: Money,
    pub tax_value: Money,
    pub commission_value: Money,
    pub fixed_fees: Money,
    pub shipping_cost: Money,
    pub fulfillment_cost: Money,
    pub advertising_cost: Money,
    pub other_fees: Money,
    pub total_channel_costs: Money,
    /// May be negative.
    pub gross_profit: Money,
    /// May be negative.
    pub net_profit: Money,
    pub profit_margin_percent: Percent,
    pub markup_percent: Percent,
    /// Same value as `markup_percent`: profit over landed cost.
    pub roi: Percent,
    pub is_profitable: bool,
    pub is_competitive: bool,
    pub price_position: PricePosition,
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the profitability of `channel` for a product with the given
/// landed cost and tax rate.
///
/// ## Errors
/// `ValidationError` when the cost, the tax rate, the price, any fee, or the
/// optional bounds are negative, or when `min_price > max_price`.
///
/// ## Example
/// ```rust
/// use margin_core::calculator::calculate_channel;
/// use margin_core::fees::create_default_channel;
/// use margin_core::{ChannelType, Money, Percent};
///
/// let mut fba = create_default_channel(ChannelType::AmazonFba);
/// fba.selling_price = Money::from_cents(15000);
/// fba.fees.fulfillment_fee = Money::from_cents(1200);
/// fba.fees.advertising_percent = Percent::from_whole(5);
///
/// let calc = calculate_channel(Money::from_cents(5000), Percent::from_whole(10), &fba).unwrap();
/// assert_eq!(calc.net_profit.cents(), 5300);
/// assert_eq!(calc.profit_margin_percent.bps(), 3533);
/// assert!(calc.is_profitable);
/// ```
pub fn calculate_channel(
    total_cost: Money,
    tax_percent: Percent,
    channel: &SalesChannel,
) -> ValidationResult<PricingCalculation> {
    validate_amount(total_cost, "totalCost")?;
    validate_percent(tax_percent, "taxPercent")?;
    validate_channel_numbers(channel)?;

    let price = channel.selling_price;
    let fees = &channel.fees;

    let commission_value = price.percent_of(fees.commission_percent);
    let advertising_cost = price.percent_of(fees.advertising_percent);
    let fulfillment_cost = fees.fulfillment_fee;
    let shipping_cost = fees.shipping_cost;
    let fixed_fees = fees.fixed_fee;
    let other_fees = fees.other_fees;

    let total_channel_costs = commission_value
        + fixed_fees
        + shipping_cost
        + fulfillment_cost
        + advertising_cost
        + other_fees;

    let tax_value = total_cost.percent_of(tax_percent);
    let gross_profit = price - total_cost - tax_value;
    let net_profit = gross_profit - total_channel_costs;

    let profit_margin_percent = Percent::ratio(net_profit, price);
    let markup_percent = Percent::ratio(net_profit, total_cost);
    let roi = markup_percent;

    let is_competitive = match channel.competitor_price {
        None => true,
        Some(competitor) => price <= competitor,
    };

    Ok(PricingCalculation {
        channel_type: channel.channel_type,
        channel_name: channel.name.clone(),
        selling_price: price,
        total_cost,
        tax_value,
        commission_value,
        fixed_fees,
        shipping_cost,
        fulfillment_cost,
        advertising_cost,
        other_fees,
        total_channel_costs,
        gross_profit,
        net_profit,
        profit_margin_percent,
        markup_percent,
        roi,
        is_profitable: net_profit.is_positive(),
        is_competitive,
        price_position: PricePosition::classify(price, channel.min_price, channel.max_price),
    })
}

// =============================================================================
// Price Suggestions
// =============================================================================

/// Net profit at `price`, computed with the same steps as [`calculate_channel`].
fn net_profit_at(total_cost: Money, tax_value: Money, fees: &ChannelFees, price: Money) -> Money {
    let channel_costs = price.percent_of(fees.commission_percent)
        + fees.fixed_fee
        + fees.shipping_cost
        + fees.fulfillment_fee
        + price.percent_of(fees.advertising_percent)
        + fees.other_fees;
    price - total_cost - tax_value - channel_costs
}

/// Smallest whole-cent price whose margin is at least `target`.
///
/// With `A = 10000 − c − a − target` (bps) and `F` the fixed costs, the
/// exact solution is `F × 10000 / A`. Rounding the commission and
/// advertising steps moves net profit by at most one cent, and a margin is
/// accepted once it rounds to `target`, i.e. from `target − 0.5bp`. So every
/// qualifying price satisfies `p × (2A + 1) ≥ 20000 × (F − 1)` and every
/// price with `p × (2A + 1) ≥ 20000 × (F + 1)` qualifies. Only the prices
/// between those two bounds are scanned; that band is at most
/// `40000 / (2A + 1)` cents wide whatever the price. With a zero target
/// the binding condition is `net ≥ 0` and the band is `F ± 1` over `A`.
fn solve_price(
    total_cost: Money,
    tax_percent: Percent,
    fees: &ChannelFees,
    target: Percent,
) -> Option<Money> {
    let tax_value = total_cost.percent_of(tax_percent);
    let fixed = total_cost
        + tax_value
        + fees.fixed_fee
        + fees.shipping_cost
        + fees.fulfillment_fee
        + fees.other_fees;

    let available_bps = 10_000
        - fees.commission_percent.bps()
        - fees.advertising_percent.bps()
        - target.bps();
    if available_bps <= 0 {
        return None;
    }

    let (scale, denominator) = if target.bps() > 0 {
        (20_000i128, 2 * available_bps as i128 + 1)
    } else {
        (10_000i128, available_bps as i128)
    };
    let fixed = fixed.cents() as i128;
    let low = (scale * (fixed - 1)).div_euclid(denominator).max(0);
    let high = -(-(scale * (fixed + 1))).div_euclid(denominator);

    let meets_target = |price: &Money| {
        let net = net_profit_at(total_cost, tax_value, fees, *price);
        if price.is_zero() {
            return net >= Money::zero() && target.bps() <= 0;
        }
        Percent::ratio(net, *price) >= target && net >= Money::zero()
    };

    (low..=high)
        .map(|cents| Money::from_cents(cents as i64))
        .find(meets_target)
}

/// Lowest selling price at which the channel does not lose money
/// (`net_profit >= 0`).
///
/// Returns `None` when the percentage fees take 100% or more of the price,
/// so no price can cover the costs.
///
/// ## Example
/// ```rust
/// use margin_core::calculator::break_even_price;
/// use margin_core::{ChannelFees, Money, Percent};
///
/// let fees = ChannelFees { commission_percent: Percent::from_whole(20), ..Default::default() };
/// // 40.00 / 0.80 = 50.00
/// let price = break_even_price(Money::from_cents(4000), Percent::zero(), &fees).unwrap();
/// assert_eq!(price.unwrap().cents(), 5000);
/// ```
pub fn break_even_price(
    total_cost: Money,
    tax_percent: Percent,
    fees: &ChannelFees,
) -> ValidationResult<Option<Money>> {
    validate_amount(total_cost, "totalCost")?;
    validate_percent(tax_percent, "taxPercent")?;
    validate_fees(fees)?;
    Ok(solve_price(total_cost, tax_percent, fees, Percent::zero()))
}

/// Lowest selling price whose profit margin reaches `target_margin`.
///
/// Returns `None` when `commission + advertising + target` is 100% or more.
pub fn price_for_target_margin(
    total_cost: Money,
    tax_percent: Percent,
    fees: &ChannelFees,
    target_margin: Percent,
) -> ValidationResult<Option<Money>> {
    validate_amount(total_cost, "totalCost")?;
    validate_percent(tax_percent, "taxPercent")?;
    validate_fees(fees)?;
    validate_percent(target_margin, "targetMargin")?;
    Ok(solve_price(total_cost, tax_percent, fees, target_margin))
}

// =============================================================================
// Unit Tests
// =============================================================================
