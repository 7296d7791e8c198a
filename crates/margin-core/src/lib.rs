//! # margin-core: Pure Pricing Logic
//!
//! This crate holds the pricing and profitability rules of the engine as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Multi-Channel Pricing Engine                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 margin-session (Channel Manager)                │   │
//! │  │   edit fees/prices ──► recompute ──► apply suggestion ──► save  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ margin-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   fees    │  │ calculator │  │aggregator │  │   │
//! │  │   │  Channel  │  │  defaults │  │  per-chan  │  │ best/worst│  │   │
//! │  │   │  Percent  │  │  models   │  │  solvers   │  │  bands    │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                margin-db (Persistence Layer)                    │   │
//! │  │         SQLite products, sales_channels, migrations             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (cents)
//! - [`types`] - Percent, ChannelType, ChannelFees, SalesChannel
//! - [`fees`] - Per-channel fee models and default configurations
//! - [`cost`] - Landed cost aggregation
//! - [`calculator`] - Single-channel profitability and price solvers
//! - [`aggregator`] - Cross-channel comparison
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, every time
//! 2. **No I/O**: storage and UI concerns live in the other crates
//! 3. **Integer Money**: cents (i64) and basis points, never floats
//! 4. **Explicit Errors**: negative inputs are rejected with a typed error
//!
//! ## Example Usage
//!
//! ```rust
//! use margin_core::{calculate_for_product, create_default_channel};
//! use margin_core::{ChannelType, Money, Percent, ProductCost};
//!
//! let cost = ProductCost::new(Money::from_cents(4500), Money::from_cents(500), Percent::from_whole(10)).unwrap();
//!
//! let mut site = create_default_channel(ChannelType::SiteProprio);
//! site.enabled = true;
//! site.selling_price = Money::from_cents(9990);
//!
//! let comparison = calculate_for_product(&cost, &[site]).unwrap();
//! let best = comparison.best().unwrap();
//!
//! // 99.90 - 50.00 cost - 5.00 tax
//! assert_eq!(best.net_profit.cents(), 4490);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod calculator;
pub mod cost;
pub mod error;
pub mod fees;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use margin_core::Money` instead of
// `use margin_core::money::Money`

pub use aggregator::{calculate_all_channels, calculate_for_product, ChannelComparison, MarginBand};
pub use calculator::{
    break_even_price, calculate_channel, price_for_target_margin, PricePosition,
    PricingCalculation,
};
pub use cost::{landed_cost, ProductCost};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::{
    create_default_channel, create_empty_channel, defaults_for, ensure_all_channels,
    ChannelFeeModel, FeeField, FeeValue,
};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tenant every product belongs to.
///
/// The schema carries `tenant_id` on every table, but a running engine
/// serves exactly one tenant.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Target margin applied when the caller does not give one: 20%.
pub const DEFAULT_TARGET_MARGIN: types::Percent = types::Percent::from_bps(2_000);
