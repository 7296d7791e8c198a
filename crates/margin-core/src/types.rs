//! # Domain Types
//!
//! Core domain types shared by every layer of Margin.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductPricing  │   │  SalesChannel   │   │  ChannelFees    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │──►│  channel_type   │──►│  commission %   │       │
//! │  │  cost           │ n │  enabled        │   │  fixed_fee      │       │
//! │  │  channels       │   │  selling_price  │   │  shipping_cost  │       │
//! │  └─────────────────┘   │  fees           │   │  fulfillment    │       │
//! │                        └─────────────────┘   │  advertising %  │       │
//! │                                              │  other_fees     │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   └─────────────────┘       │
//! │  │    Percent      │   │  ChannelType    │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  bps (i64)      │   │  closed enum,   │                             │
//! │  │  1500 = 15%     │   │  one per venue  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::cost::ProductCost;
use crate::error::ValidationError;
use crate::money::{self, Money};

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 1500 bps = 15%.
/// Signed because derived percentages (margin, ROI) go negative on a loss;
/// input percentages are validated non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number of percent (15 → 15%).
    #[inline]
    pub const fn from_whole(percent: i64) -> Self {
        Percent(percent * 100)
    }

    /// Parses a decimal string such as `"15"` or `"8.25"`.
    pub fn parse(input: &str, field: &str) -> Result<Self, ValidationError> {
        money::parse_hundredths(input, field).map(Percent)
    }

    /// `numerator / denominator × 100`, rounded to the basis point.
    ///
    /// Returns zero when the denominator is zero; that is the defined value
    /// of margin at a zero price and of ROI at a zero cost.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::money::Money;
    /// use margin_core::types::Percent;
    ///
    /// let margin = Percent::ratio(Money::from_cents(5300), Money::from_cents(15000));
    /// assert_eq!(margin.bps(), 3533); // 35.33%
    /// assert_eq!(Percent::ratio(Money::from_cents(100), Money::zero()).bps(), 0);
    /// ```
    pub fn ratio(numerator: Money, denominator: Money) -> Self {
        if denominator.is_zero() {
            return Percent::zero();
        }
        let bps = money::div_round_half_away(
            numerator.cents() as i128 * 10_000,
            denominator.cents() as i128,
        );
        Percent(bps as i64)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the rate is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}%", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Channel Type
// =============================================================================

/// The closed set of sales channels a product can be listed on.
///
/// Declaration order is the canonical enumeration order: it is the final
/// tie-break when two channels compare equal, and the order in which a
/// product's channel set is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelType {
    /// Own storefront.
    SiteProprio,
    /// Amazon, seller ships (Fulfilled by Merchant).
    AmazonFbm,
    /// Amazon collects from the seller and delivers (Delivery by Amazon).
    AmazonDba,
    /// Amazon warehouses and ships (Fulfilled by Amazon).
    AmazonFba,
    /// Mercado Livre classic listing.
    MercadoLivreClassico,
    /// Mercado Livre premium listing (installments without interest).
    MercadoLivrePremium,
    /// Mercado Livre fulfillment (FULL).
    MercadoLivreFull,
    /// Shopee.
    Shopee,
    /// Any other marketplace.
    Marketplace,
}

impl ChannelType {
    /// Every channel type, in enumeration order.
    pub const ALL: [ChannelType; 9] = [
        ChannelType::SiteProprio,
        ChannelType::AmazonFbm,
        ChannelType::AmazonDba,
        ChannelType::AmazonFba,
        ChannelType::MercadoLivreClassico,
        ChannelType::MercadoLivrePremium,
        ChannelType::MercadoLivreFull,
        ChannelType::Shopee,
        ChannelType::Marketplace,
    ];

    /// Position of this type in [`ChannelType::ALL`].
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// The wire/database code, e.g. `"AMAZON_FBA"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ChannelType::SiteProprio => "SITE_PROPRIO",
            ChannelType::AmazonFbm => "AMAZON_FBM",
            ChannelType::AmazonDba => "AMAZON_DBA",
            ChannelType::AmazonFba => "AMAZON_FBA",
            ChannelType::MercadoLivreClassico => "MERCADO_LIVRE_CLASSICO",
            ChannelType::MercadoLivrePremium => "MERCADO_LIVRE_PREMIUM",
            ChannelType::MercadoLivreFull => "MERCADO_LIVRE_FULL",
            ChannelType::Shopee => "SHOPEE",
            ChannelType::Marketplace => "MARKETPLACE",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ChannelType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| ValidationError::UnknownChannelType(code.to_string()))
    }
}

// =============================================================================
// Channel Fees
// =============================================================================

/// Fee structure of one channel.
///
/// Every field is always present. A fee that does not apply to a channel
/// type is simply zero, so the calculator runs the same arithmetic for
/// every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChannelFees {
    /// Marketplace commission on the selling price.
    pub commission_percent: Percent,
    /// Flat deduction per sale.
    pub fixed_fee: Money,
    /// Outbound freight paid by the seller.
    pub shipping_cost: Money,
    /// Warehousing / prep-center cost (FBA, FULL).
    pub fulfillment_fee: Money,
    /// Advertising spend as a share of the selling price.
    pub advertising_percent: Percent,
    /// Anything else, absolute.
    pub other_fees: Money,
}

// =============================================================================
// Sales Channel
// =============================================================================

/// One channel configuration attached to a product.
///
/// A product holds exactly one `SalesChannel` per [`ChannelType`].
/// Disabling a channel keeps its configuration so it can be re-enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannel {
    /// Storage identifier. Empty until the channel is first saved.
    pub id: String,

    #[serde(rename = "type")]
    pub channel_type: ChannelType,

    /// Display name.
    pub name: String,

    pub enabled: bool,

    pub selling_price: Money,

    pub fees: ChannelFees,

    /// Lowest price the seller accepts on this channel.
    pub min_price: Option<Money>,

    /// Highest price the seller wants to list at.
    pub max_price: Option<Money>,

    /// Best known competitor price on this channel.
    pub competitor_price: Option<Money>,
}

// =============================================================================
// Product Pricing
// =============================================================================

/// The persisted pricing aggregate of one product: its cost basis plus the
/// full channel set. Saved and loaded as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricing {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub cost: ProductCost,
    pub channels: Vec<SalesChannel>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
