//! # Validation Module
//!
//! Input validation for pricing data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend form                                                │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Channel Manager edit (Rust)                                  │
//! │  └── THIS MODULE: fail fast on the edited value                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator entry                                             │
//! │  └── THIS MODULE again: nothing negative reaches the arithmetic        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK (... >= 0) constraints                                      │
//! │  └── UNIQUE (product_id, channel_type)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ChannelFees, Percent, SalesChannel};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a channel display name.
pub const MAX_CHANNEL_NAME_LEN: usize = 100;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a money input (price, cost, fee).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (a free item, an unset fee)
///
/// ## Example
/// ```rust
/// use margin_core::money::Money;
/// use margin_core::validation::validate_amount;
///
/// assert!(validate_amount(Money::from_cents(1099), "sellingPrice").is_ok());
/// assert!(validate_amount(Money::zero(), "sellingPrice").is_ok());
/// assert!(validate_amount(Money::from_cents(-1), "sellingPrice").is_err());
/// ```
pub fn validate_amount(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::negative(field));
    }
    Ok(())
}

/// Validates a percentage input (commission, advertising, tax).
///
/// ## Rules
/// - Must be non-negative
/// - No upper bound: a commission above 100% is unusual but computes fine
pub fn validate_percent(percent: Percent, field: &str) -> ValidationResult<()> {
    if percent.is_negative() {
        return Err(ValidationError::negative(field));
    }
    Ok(())
}

fn validate_optional_amount(amount: Option<Money>, field: &str) -> ValidationResult<()> {
    match amount {
        Some(amount) => validate_amount(amount, field),
        None => Ok(()),
    }
}

// =============================================================================
// Channel Validators
// =============================================================================

/// Validates every component of a fee structure.
pub fn validate_fees(fees: &ChannelFees) -> ValidationResult<()> {
    validate_percent(fees.commission_percent, "commissionPercent")?;
    validate_amount(fees.fixed_fee, "fixedFee")?;
    validate_amount(fees.shipping_cost, "shippingCost")?;
    validate_amount(fees.fulfillment_fee, "fulfillmentFee")?;
    validate_percent(fees.advertising_percent, "advertisingPercent")?;
    validate_amount(fees.other_fees, "otherFees")?;
    Ok(())
}

/// Validates a channel display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_channel_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_CHANNEL_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_CHANNEL_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates the numeric inputs of a channel: price, fees, bounds and
/// competitor price.
///
/// This is what the calculator checks before it computes anything.
pub fn validate_channel_numbers(channel: &SalesChannel) -> ValidationResult<()> {
    validate_amount(channel.selling_price, "sellingPrice")?;
    validate_fees(&channel.fees)?;
    validate_optional_amount(channel.min_price, "minPrice")?;
    validate_optional_amount(channel.max_price, "maxPrice")?;
    validate_optional_amount(channel.competitor_price, "competitorPrice")?;

    if let (Some(min), Some(max)) = (channel.min_price, channel.max_price) {
        if min > max {
            return Err(ValidationError::PriceBoundsInverted {
                channel: channel.channel_type,
                min_cents: min.cents(),
                max_cents: max.cents(),
            });
        }
    }

    Ok(())
}

/// Validates a full channel record, name included.
pub fn validate_channel(channel: &SalesChannel) -> ValidationResult<()> {
    validate_channel_name(&channel.name)?;
    validate_channel_numbers(channel)
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a product SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, numbers, hyphens and underscores only
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string (product and channel identifiers).
///
/// ## Example
/// ```rust
/// use margin_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::create_default_channel;
    use crate::types::ChannelType;

    #[test]
    fn test_validate_amount_and_percent() {
        assert!(validate_amount(Money::zero(), "x").is_ok());
        assert!(validate_amount(Money::from_cents(-1), "x").is_err());
        assert!(validate_percent(Percent::zero(), "x").is_ok());
        assert!(validate_percent(Percent::from_bps(15_000), "x").is_ok());
        assert!(validate_percent(Percent::from_bps(-1), "x").is_err());
    }

    #[test]
    fn test_validate_fees_names_the_field() {
        let mut fees = ChannelFees::default();
        fees.shipping_cost = Money::from_cents(-100);
        assert_eq!(validate_fees(&fees), Err(ValidationError::negative("shippingCost")));

        let mut fees = ChannelFees::default();
        fees.commission_percent = Percent::from_bps(-1500);
        assert_eq!(
            validate_fees(&fees),
            Err(ValidationError::negative("commissionPercent"))
        );
    }

    #[test]
    fn test_validate_channel() {
        let mut channel = create_default_channel(ChannelType::AmazonFbm);
        channel.selling_price = Money::from_cents(9900);
        assert!(validate_channel(&channel).is_ok());

        channel.selling_price = Money::from_cents(-1);
        assert_eq!(
            validate_channel(&channel),
            Err(ValidationError::negative("sellingPrice"))
        );

        channel.selling_price = Money::from_cents(9900);
        channel.name = "  ".to_string();
        assert!(matches!(
            validate_channel(&channel),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_price_bounds() {
        let mut channel = create_default_channel(ChannelType::Shopee);
        channel.min_price = Some(Money::from_cents(5000));
        channel.max_price = Some(Money::from_cents(5000));
        assert!(validate_channel_numbers(&channel).is_ok());

        channel.max_price = Some(Money::from_cents(4000));
        assert!(matches!(
            validate_channel_numbers(&channel),
            Err(ValidationError::PriceBoundsInverted { .. })
        ));
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("CANECA-300").is_ok());
        assert!(validate_sku("kit_2").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
