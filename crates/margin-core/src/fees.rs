//! # Channel Fee Model
//!
//! Which fee components each [`ChannelType`] charges, and the defaults a
//! freshly created channel starts with.
//!
//! ## Fee Shapes
//! ```text
//! ┌───────────────────────────┬──────┬───────┬──────┬───────┬─────┬───────┐
//! │ Channel                   │ Comm │ Fixed │ Ship │ Fulf. │ Ads │ Other │
//! ├───────────────────────────┼──────┼───────┼──────┼───────┼─────┼───────┤
//! │ SITE_PROPRIO              │  0%  │   ✓   │  ✓   │       │  ✓  │   ✓   │
//! │ AMAZON_FBM                │ 15%  │   ✓   │  ✓   │       │  ✓  │   ✓   │
//! │ AMAZON_DBA                │ 15%  │   ✓   │  ✓   │       │  ✓  │   ✓   │
//! │ AMAZON_FBA                │ 15%  │   ✓   │      │   ✓   │  ✓  │   ✓   │
//! │ MERCADO_LIVRE_CLASSICO    │ 12%  │ 6.00  │  ✓   │       │  ✓  │   ✓   │
//! │ MERCADO_LIVRE_PREMIUM     │ 17%  │ 6.00  │  ✓   │       │  ✓  │   ✓   │
//! │ MERCADO_LIVRE_FULL        │ 17%  │ 6.00  │      │   ✓   │  ✓  │   ✓   │
//! │ SHOPEE                    │ 20%  │ 4.00  │  ✓   │       │  ✓  │   ✓   │
//! │ MARKETPLACE               │ 15%  │   ✓   │  ✓   │   ✓   │  ✓  │   ✓   │
//! └───────────────────────────┴──────┴───────┴──────┴───────┴─────┴───────┘
//! ```
//!
//! The table is a `static`: built at compile time, read through
//! [`defaults_for`], and there is no API that mutates it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ChannelFees, ChannelType, Percent, SalesChannel};
use crate::validation::ValidationResult;

// =============================================================================
// Fee Field
// =============================================================================

/// One component of [`ChannelFees`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeField {
    Commission,
    FixedFee,
    Shipping,
    Fulfillment,
    Advertising,
    Other,
}

impl FeeField {
    /// Every fee field, in struct order.
    pub const ALL: [FeeField; 6] = [
        FeeField::Commission,
        FeeField::FixedFee,
        FeeField::Shipping,
        FeeField::Fulfillment,
        FeeField::Advertising,
        FeeField::Other,
    ];

    /// Whether the field holds a percentage of the selling price rather than
    /// an absolute amount.
    pub const fn is_percentage(self) -> bool {
        matches!(self, FeeField::Commission | FeeField::Advertising)
    }

    /// The JSON field name inside `fees`.
    pub const fn field_name(self) -> &'static str {
        match self {
            FeeField::Commission => "commissionPercent",
            FeeField::FixedFee => "fixedFee",
            FeeField::Shipping => "shippingCost",
            FeeField::Fulfillment => "fulfillmentFee",
            FeeField::Advertising => "advertisingPercent",
            FeeField::Other => "otherFees",
        }
    }

    /// Parses user input for this field into the right kind of value.
    pub fn parse_value(self, input: &str) -> ValidationResult<FeeValue> {
        if self.is_percentage() {
            Percent::parse(input, self.field_name()).map(FeeValue::Percent)
        } else {
            Money::parse(input, self.field_name()).map(FeeValue::Amount)
        }
    }
}

/// A value for a single fee field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FeeValue {
    Percent(Percent),
    Amount(Money),
}

impl FeeValue {
    pub fn is_zero(&self) -> bool {
        match self {
            FeeValue::Percent(p) => p.is_zero(),
            FeeValue::Amount(m) => m.is_zero(),
        }
    }
}

impl ChannelFees {
    /// Reads one field.
    pub fn get(&self, field: FeeField) -> FeeValue {
        match field {
            FeeField::Commission => FeeValue::Percent(self.commission_percent),
            FeeField::FixedFee => FeeValue::Amount(self.fixed_fee),
            FeeField::Shipping => FeeValue::Amount(self.shipping_cost),
            FeeField::Fulfillment => FeeValue::Amount(self.fulfillment_fee),
            FeeField::Advertising => FeeValue::Percent(self.advertising_percent),
            FeeField::Other => FeeValue::Amount(self.other_fees),
        }
    }

    /// Writes one field.
    ///
    /// Fails when the value kind does not match the field (an amount for a
    /// percentage field or the reverse) or when the value is negative.
    pub fn set(&mut self, field: FeeField, value: FeeValue) -> ValidationResult<()> {
        let name = field.field_name();
        match (field.is_percentage(), value) {
            (true, FeeValue::Percent(p)) if p.is_negative() => {
                Err(ValidationError::negative(name))
            }
            (false, FeeValue::Amount(m)) if m.is_negative() => {
                Err(ValidationError::negative(name))
            }
            (true, FeeValue::Percent(p)) => {
                match field {
                    FeeField::Commission => self.commission_percent = p,
                    _ => self.advertising_percent = p,
                }
                Ok(())
            }
            (false, FeeValue::Amount(m)) => {
                match field {
                    FeeField::FixedFee => self.fixed_fee = m,
                    FeeField::Shipping => self.shipping_cost = m,
                    FeeField::Fulfillment => self.fulfillment_fee = m,
                    _ => self.other_fees = m,
                }
                Ok(())
            }
            (true, FeeValue::Amount(_)) => Err(ValidationError::InvalidFormat {
                field: name.to_string(),
                reason: "expected a percentage".to_string(),
            }),
            (false, FeeValue::Percent(_)) => Err(ValidationError::InvalidFormat {
                field: name.to_string(),
                reason: "expected an amount".to_string(),
            }),
        }
    }
}

// =============================================================================
// Channel Fee Model
// =============================================================================

/// Fee schema of one channel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFeeModel {
    pub channel_type: ChannelType,
    /// Name given to a newly created channel.
    pub display_name: &'static str,
    /// Fee fields this channel actually charges.
    pub applicable: &'static [FeeField],
    /// Fees a newly created channel starts with.
    pub defaults: ChannelFees,
}

impl ChannelFeeModel {
    /// Whether `field` is meaningful for this channel type.
    pub fn applies(&self, field: FeeField) -> bool {
        self.applicable.contains(&field)
    }

    /// Rejects a non-zero value in any field this channel does not charge.
    pub fn check_applicable(&self, fees: &ChannelFees) -> ValidationResult<()> {
        for field in FeeField::ALL {
            if !self.applies(field) && !fees.get(field).is_zero() {
                return Err(ValidationError::FeeNotApplicable {
                    channel: self.channel_type,
                    field,
                });
            }
        }
        Ok(())
    }
}

const SHIPPED_BY_SELLER: &[FeeField] = &[
    FeeField::Commission,
    FeeField::FixedFee,
    FeeField::Shipping,
    FeeField::Advertising,
    FeeField::Other,
];

const FULFILLED_BY_CHANNEL: &[FeeField] = &[
    FeeField::Commission,
    FeeField::FixedFee,
    FeeField::Fulfillment,
    FeeField::Advertising,
    FeeField::Other,
];

const fn fees(commission_bps: i64, fixed_fee_cents: i64) -> ChannelFees {
    ChannelFees {
        commission_percent: Percent::from_bps(commission_bps),
        fixed_fee: Money::from_cents(fixed_fee_cents),
        shipping_cost: Money::zero(),
        fulfillment_fee: Money::zero(),
        advertising_percent: Percent::zero(),
        other_fees: Money::zero(),
    }
}

/// One entry per `ChannelType`, in enumeration order.
static FEE_MODELS: [ChannelFeeModel; 9] = [
    ChannelFeeModel {
        channel_type: ChannelType::SiteProprio,
        display_name: "Site Próprio",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(0, 0),
    },
    ChannelFeeModel {
        channel_type: ChannelType::AmazonFbm,
        display_name: "Amazon FBM",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(1500, 0),
    },
    ChannelFeeModel {
        channel_type: ChannelType::AmazonDba,
        display_name: "Amazon DBA",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(1500, 0),
    },
    ChannelFeeModel {
        channel_type: ChannelType::AmazonFba,
        display_name: "Amazon FBA",
        applicable: FULFILLED_BY_CHANNEL,
        defaults: fees(1500, 0),
    },
    ChannelFeeModel {
        channel_type: ChannelType::MercadoLivreClassico,
        display_name: "Mercado Livre Clássico",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(1200, 600),
    },
    ChannelFeeModel {
        channel_type: ChannelType::MercadoLivrePremium,
        display_name: "Mercado Livre Premium",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(1700, 600),
    },
    ChannelFeeModel {
        channel_type: ChannelType::MercadoLivreFull,
        display_name: "Mercado Livre FULL",
        applicable: FULFILLED_BY_CHANNEL,
        defaults: fees(1700, 600),
    },
    ChannelFeeModel {
        channel_type: ChannelType::Shopee,
        display_name: "Shopee",
        applicable: SHIPPED_BY_SELLER,
        defaults: fees(2000, 400),
    },
    ChannelFeeModel {
        channel_type: ChannelType::Marketplace,
        display_name: "Marketplace",
        applicable: &FeeField::ALL,
        defaults: fees(1500, 0),
    },
];

/// Fee model of a channel type.
///
/// ## Panics
/// If the static table is out of step with `ChannelType` declaration order.
/// That is a build defect, not a runtime condition.
pub fn defaults_for(channel_type: ChannelType) -> &'static ChannelFeeModel {
    let model = &FEE_MODELS[channel_type.ordinal()];
    assert_eq!(
        model.channel_type, channel_type,
        "fee model table out of order at {}",
        channel_type
    );
    model
}

// =============================================================================
// Default Channels
// =============================================================================

/// Creates a disabled channel with the fee model's defaults and zero price.
///
/// ## Example
/// ```rust
/// use margin_core::fees::create_default_channel;
/// use margin_core::ChannelType;
///
/// let fba = create_default_channel(ChannelType::AmazonFba);
/// assert!(!fba.enabled);
/// assert_eq!(fba.fees.commission_percent.bps(), 1500);
/// ```
pub fn create_default_channel(channel_type: ChannelType) -> SalesChannel {
    let model = defaults_for(channel_type);
    SalesChannel {
        id: String::new(),
        channel_type,
        name: model.display_name.to_string(),
        enabled: false,
        selling_price: Money::zero(),
        fees: model.defaults,
        min_price: None,
        max_price: None,
        competitor_price: None,
    }
}

/// Same as [`create_default_channel`]; the name used by the frontend when a
/// product lacks configuration for a channel type.
pub fn create_empty_channel(channel_type: ChannelType) -> SalesChannel {
    create_default_channel(channel_type)
}

/// Completes a channel set so every `ChannelType` has exactly one entry.
///
/// Missing types get a disabled default channel. The result is in
/// enumeration order. A type present twice is rejected.
pub fn ensure_all_channels(channels: Vec<SalesChannel>) -> ValidationResult<Vec<SalesChannel>> {
    let mut slots: [Option<SalesChannel>; 9] = Default::default();

    for channel in channels {
        let slot = &mut slots[channel.channel_type.ordinal()];
        if slot.is_some() {
            return Err(ValidationError::DuplicateChannel(channel.channel_type));
        }
        *slot = Some(channel);
    }

    Ok(ChannelType::ALL
        .into_iter()
        .zip(slots)
        .map(|(channel_type, slot)| slot.unwrap_or_else(|| create_default_channel(channel_type)))
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_type_in_order() {
        for channel_type in ChannelType::ALL {
            assert_eq!(defaults_for(channel_type).channel_type, channel_type);
        }
    }

    #[test]
    fn test_fulfillment_vs_shipping_shapes() {
        let fba = defaults_for(ChannelType::AmazonFba);
        assert!(fba.applies(FeeField::Fulfillment));
        assert!(!fba.applies(FeeField::Shipping));

        let fbm = defaults_for(ChannelType::AmazonFbm);
        assert!(fbm.applies(FeeField::Shipping));
        assert!(!fbm.applies(FeeField::Fulfillment));

        let full = defaults_for(ChannelType::MercadoLivreFull);
        assert!(full.applies(FeeField::Fulfillment));
    }

    #[test]
    fn test_defaults_are_valid_for_their_own_model() {
        for channel_type in ChannelType::ALL {
            let model = defaults_for(channel_type);
            assert!(model.check_applicable(&model.defaults).is_ok());
        }
    }

    #[test]
    fn test_create_default_channel() {
        let channel = create_default_channel(ChannelType::Shopee);
        assert_eq!(channel.channel_type, ChannelType::Shopee);
        assert_eq!(channel.name, "Shopee");
        assert!(!channel.enabled);
        assert!(channel.selling_price.is_zero());
        assert_eq!(channel.fees.commission_percent.bps(), 2000);
        assert_eq!(channel.fees.fixed_fee.cents(), 400);
        assert_eq!(create_empty_channel(ChannelType::Shopee), channel);
    }

    #[test]
    fn test_check_applicable_rejects_foreign_fee() {
        let model = defaults_for(ChannelType::SiteProprio);
        let mut fees = model.defaults;
        fees.fulfillment_fee = Money::from_cents(1200);

        assert_eq!(
            model.check_applicable(&fees),
            Err(ValidationError::FeeNotApplicable {
                channel: ChannelType::SiteProprio,
                field: FeeField::Fulfillment,
            })
        );
    }

    #[test]
    fn test_fee_set_and_get() {
        let mut fees = ChannelFees::default();
        fees.set(FeeField::Commission, FeeValue::Percent(Percent::from_whole(12)))
            .unwrap();
        fees.set(FeeField::Shipping, FeeValue::Amount(Money::from_cents(1990)))
            .unwrap();

        assert_eq!(fees.commission_percent.bps(), 1200);
        assert_eq!(fees.get(FeeField::Shipping), FeeValue::Amount(Money::from_cents(1990)));

        assert!(matches!(
            fees.set(FeeField::Commission, FeeValue::Amount(Money::from_cents(1))),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(
            fees.set(FeeField::Advertising, FeeValue::Percent(Percent::from_bps(-1))),
            Err(ValidationError::negative("advertisingPercent"))
        );
    }

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(
            FeeField::Commission.parse_value("16.5").unwrap(),
            FeeValue::Percent(Percent::from_bps(1650))
        );
        assert_eq!(
            FeeField::Fulfillment.parse_value("12").unwrap(),
            FeeValue::Amount(Money::from_cents(1200))
        );
    }

    #[test]
    fn test_ensure_all_channels_fills_and_orders() {
        let mut shopee = create_default_channel(ChannelType::Shopee);
        shopee.enabled = true;
        let mut site = create_default_channel(ChannelType::SiteProprio);
        site.enabled = true;

        let all = ensure_all_channels(vec![shopee, site]).unwrap();

        assert_eq!(all.len(), ChannelType::ALL.len());
        let types: Vec<ChannelType> = all.iter().map(|c| c.channel_type).collect();
        assert_eq!(types, ChannelType::ALL.to_vec());
        assert!(all[0].enabled);
        assert!(all[ChannelType::Shopee.ordinal()].enabled);
        assert!(!all[ChannelType::AmazonFba.ordinal()].enabled);
    }

    #[test]
    fn test_ensure_all_channels_rejects_duplicates() {
        let a = create_default_channel(ChannelType::AmazonFba);
        let b = create_default_channel(ChannelType::AmazonFba);
        assert_eq!(
            ensure_all_channels(vec![a, b]),
            Err(ValidationError::DuplicateChannel(ChannelType::AmazonFba))
        );
    }
}
