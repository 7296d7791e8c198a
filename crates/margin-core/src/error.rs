//! # Error Types
//!
//! Domain-specific error types for margin-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  margin-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  margin-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  margin-session errors                                                 │
//! │  ├── StoreError       - Persistence boundary failures                  │
//! │  └── SessionError     - What the editing UI sees                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → UI field error     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, channel type)
//! 3. Errors are enum variants, never String
//! 4. A validation error is a caller-input bug; nothing here is retried

use thiserror::Error;

use crate::fees::FeeField;
use crate::types::ChannelType;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product has no configuration for the requested channel.
    ///
    /// ## When This Occurs
    /// - Editing a channel on a channel set that was never completed with
    ///   `ensure_all_channels`
    #[error("Channel not configured: {0}")]
    ChannelNotFound(ChannelType),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised where the invalid input is constructed or edited, never deferred
/// into the aggregator. Always recoverable: reject the edit, show the field
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Money or percentage input below zero.
    ///
    /// ## When This Occurs
    /// ```text
    /// User types "-5" into Commission %
    ///      │
    ///      ▼
    /// validate_fees() ← rejects before any calculation runs
    ///      │
    ///      ▼
    /// Negative { field: "commissionPercent" }
    ///      │
    ///      ▼
    /// UI shows: "commissionPercent must not be negative"
    /// ```
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., invalid UUID, malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A channel code outside the closed `ChannelType` set.
    #[error("Unknown channel type: {0}")]
    UnknownChannelType(String),

    /// The same channel type appears more than once in one channel set.
    #[error("Channel {0} is configured more than once")]
    DuplicateChannel(ChannelType),

    /// `min_price` is above `max_price`.
    #[error("{channel}: minimum price {min_cents} is above maximum price {max_cents} (cents)")]
    PriceBoundsInverted {
        channel: ChannelType,
        min_cents: i64,
        max_cents: i64,
    },

    /// A non-zero value for a fee the channel type does not charge.
    #[error("{field:?} does not apply to channel {channel}")]
    FeeNotApplicable { channel: ChannelType, field: FeeField },
}

impl ValidationError {
    /// Creates a Negative error for the given field.
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ChannelNotFound(ChannelType::AmazonFba);
        assert_eq!(err.to_string(), "Channel not configured: AMAZON_FBA");

        let err = ValidationError::PriceBoundsInverted {
            channel: ChannelType::Shopee,
            min_cents: 5000,
            max_cents: 4000,
        };
        assert_eq!(
            err.to_string(),
            "SHOPEE: minimum price 5000 is above maximum price 4000 (cents)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::negative("sellingPrice").to_string(),
            "sellingPrice must not be negative"
        );
        assert_eq!(
            ValidationError::UnknownChannelType("EBAY".to_string()).to_string(),
            "Unknown channel type: EBAY"
        );
        assert_eq!(
            ValidationError::FeeNotApplicable {
                channel: ChannelType::SiteProprio,
                field: FeeField::Fulfillment,
            }
            .to_string(),
            "Fulfillment does not apply to channel SITE_PROPRIO"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::DuplicateChannel(ChannelType::Shopee).into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
