//! # margin-session: Channel Manager for Margin
//!
//! Stateful editing of one product's channel set on top of the pure
//! calculations in `margin-core` and the storage in `margin-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Margin Session Flow                              │
//! │                                                                         │
//! │  margin-report CLI / frontend commands                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  margin-session (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   SessionState ──► ChannelManager ──► report::build_report     │   │
//! │  │                        │    ▲                                   │   │
//! │  │          recompute()   │    │ load() / save()                   │   │
//! │  │                        ▼    │                                   │   │
//! │  │          margin-core aggregator   ChannelStore (async trait)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  margin-db Database (SQLite)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`manager`] - The Channel Manager: edits, recompute, dirty tracking, save
//! - [`state`] - Registry of open sessions shared across callers
//! - [`store`] - Persistence boundary and its SQLite implementation
//! - [`report`] - Serializable pricing reports and quick quotes
//! - [`config`] - Environment configuration
//! - [`error`] - Session error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use margin_session::{ChannelManager, ChannelType, Money};
//!
//! let mut manager = ChannelManager::load(&db, &product_id).await?;
//! manager.set_enabled(ChannelType::Shopee, true)?;
//! manager.set_selling_price(ChannelType::Shopee, Money::from_cents(7990))?;
//! let comparison = manager.recompute()?;
//! manager.save(&db).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod manager;
pub mod report;
pub mod state;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, SessionConfig};
pub use error::{ErrorCode, SessionError, SessionResult, StoreError};
pub use manager::ChannelManager;
pub use report::{build_report, quote, PriceSuggestion, PricingReport};
pub use state::SessionState;
pub use store::ChannelStore;

pub use margin_core::{ChannelComparison, ChannelFees, ChannelType, Money, Percent, ProductCost};
