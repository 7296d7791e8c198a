//! # Channel Manager
//!
//! One editing session over a product's channel set.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load(store, id) ──► working set + baseline (identical, clean)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  set_* / update_fee / apply_suggested_price                            │
//! │       │   validate first; a rejected edit changes nothing               │
//! │       ▼                                                                 │
//! │  recompute() ──► ChannelComparison (memoized on the inputs)            │
//! │       │                                                                 │
//! │       ├── discard_changes() ──► working set = baseline                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save(store) ──► Ok: stored set becomes working set and baseline       │
//! │              └─► Err(SaveFailed): nothing changes, still dirty          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The working set always holds exactly one channel per `ChannelType`, in
//! enumeration order.

use tracing::{debug, info, warn};

use margin_core::validation::{
    validate_amount, validate_channel_name, validate_channel_numbers, validate_fees,
};
use margin_core::{
    calculate_for_product, create_default_channel, defaults_for, ensure_all_channels,
    price_for_target_margin, ChannelComparison, ChannelFees, ChannelType, CoreError, FeeField,
    FeeValue, Money, Percent, ProductCost, ProductPricing, SalesChannel, ValidationError,
};

use crate::error::{SessionError, SessionResult};
use crate::store::ChannelStore;

/// Last comparison and the exact inputs it was computed from.
#[derive(Debug, Clone)]
struct Memo {
    cost: ProductCost,
    channels: Vec<SalesChannel>,
    comparison: ChannelComparison,
}

/// Editing session for one product.
#[derive(Debug, Clone)]
pub struct ChannelManager {
    product_id: String,
    sku: String,
    name: String,
    cost: ProductCost,
    baseline_cost: ProductCost,
    channels: Vec<SalesChannel>,
    baseline: Vec<SalesChannel>,
    memo: Option<Memo>,
}

impl ChannelManager {
    /// Opens a session on already loaded pricing.
    ///
    /// Missing channel types are filled with disabled defaults; that
    /// completion does not count as an edit.
    pub fn new(pricing: ProductPricing) -> SessionResult<Self> {
        let channels = ensure_all_channels(pricing.channels)?;
        for channel in &channels {
            validate_channel_numbers(channel)?;
        }

        Ok(ChannelManager {
            product_id: pricing.product_id,
            sku: pricing.sku,
            name: pricing.name,
            cost: pricing.cost,
            baseline_cost: pricing.cost,
            baseline: channels.clone(),
            channels,
            memo: None,
        })
    }

    /// Loads a product from the store and opens a session on it.
    pub async fn load<S>(store: &S, product_id: &str) -> SessionResult<Self>
    where
        S: ChannelStore + ?Sized,
    {
        let pricing = store
            .load_pricing(product_id)
            .await
            .map_err(|source| SessionError::LoadFailed {
                product_id: product_id.to_string(),
                source,
            })?;

        info!(product_id = %product_id, sku = %pricing.sku, "Opened pricing session");
        Self::new(pricing)
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> &ProductCost {
        &self.cost
    }

    /// Full working set in enumeration order.
    pub fn channels(&self) -> &[SalesChannel] {
        &self.channels
    }

    pub fn channel(&self, channel_type: ChannelType) -> SessionResult<&SalesChannel> {
        self.channels
            .iter()
            .find(|c| c.channel_type == channel_type)
            .ok_or_else(|| CoreError::ChannelNotFound(channel_type).into())
    }

    pub fn enabled_channels(&self) -> impl Iterator<Item = &SalesChannel> {
        self.channels.iter().filter(|c| c.enabled)
    }

    /// Applies `edit` to a copy of the channel and stores the copy only if
    /// the edit and the final validation both succeed.
    fn edit_channel<F>(&mut self, channel_type: ChannelType, edit: F) -> SessionResult<()>
    where
        F: FnOnce(&mut SalesChannel) -> Result<(), ValidationError>,
    {
        let slot = self
            .channels
            .iter_mut()
            .find(|c| c.channel_type == channel_type)
            .ok_or(SessionError::ChannelNotFound(channel_type))?;

        let mut draft = slot.clone();
        edit(&mut draft)?;
        validate_channel_numbers(&draft)?;
        *slot = draft;

        debug!(product_id = %self.product_id, channel_type = %channel_type, "Channel edited");
        Ok(())
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Replaces the cost basis.
    pub fn set_cost(
        &mut self,
        item_cost: Money,
        packaging_cost: Money,
        tax_percent: Percent,
    ) -> SessionResult<()> {
        self.cost = ProductCost::new(item_cost, packaging_cost, tax_percent)?;
        debug!(
            product_id = %self.product_id,
            total_cost = self.cost.total_cost().cents(),
            "Cost edited"
        );
        Ok(())
    }

    pub fn set_enabled(&mut self, channel_type: ChannelType, enabled: bool) -> SessionResult<()> {
        self.edit_channel(channel_type, |c| {
            c.enabled = enabled;
            Ok(())
        })
    }

    /// Renames a channel; the stored name is trimmed.
    pub fn set_name(&mut self, channel_type: ChannelType, name: &str) -> SessionResult<()> {
        validate_channel_name(name)?;
        let name = name.trim().to_string();
        self.edit_channel(channel_type, |c| {
            c.name = name;
            Ok(())
        })
    }

    pub fn set_selling_price(&mut self, channel_type: ChannelType, price: Money) -> SessionResult<()> {
        validate_amount(price, "sellingPrice")?;
        self.edit_channel(channel_type, |c| {
            c.selling_price = price;
            Ok(())
        })
    }

    /// Replaces the whole fee structure.
    ///
    /// Non-zero values in fields the channel type does not charge are
    /// rejected with `FeeNotApplicable`.
    pub fn set_fees(&mut self, channel_type: ChannelType, fees: ChannelFees) -> SessionResult<()> {
        validate_fees(&fees)?;
        defaults_for(channel_type).check_applicable(&fees)?;
        self.edit_channel(channel_type, |c| {
            c.fees = fees;
            Ok(())
        })
    }

    /// Changes one fee field.
    pub fn update_fee(
        &mut self,
        channel_type: ChannelType,
        field: FeeField,
        value: FeeValue,
    ) -> SessionResult<()> {
        if !value.is_zero() && !defaults_for(channel_type).applies(field) {
            return Err(ValidationError::FeeNotApplicable {
                channel: channel_type,
                field,
            }
            .into());
        }
        self.edit_channel(channel_type, |c| c.fees.set(field, value))
    }

    /// Sets both price bounds; `None` clears a bound.
    pub fn set_price_bounds(
        &mut self,
        channel_type: ChannelType,
        min_price: Option<Money>,
        max_price: Option<Money>,
    ) -> SessionResult<()> {
        self.edit_channel(channel_type, |c| {
            c.min_price = min_price;
            c.max_price = max_price;
            Ok(())
        })
    }

    pub fn set_competitor_price(
        &mut self,
        channel_type: ChannelType,
        price: Option<Money>,
    ) -> SessionResult<()> {
        self.edit_channel(channel_type, |c| {
            c.competitor_price = price;
            Ok(())
        })
    }

    /// Restores the fee-model defaults of a channel, keeping its id and
    /// enabled flag.
    pub fn reset_channel(&mut self, channel_type: ChannelType) -> SessionResult<()> {
        self.edit_channel(channel_type, |c| {
            let mut fresh = create_default_channel(channel_type);
            fresh.id = std::mem::take(&mut c.id);
            fresh.enabled = c.enabled;
            *c = fresh;
            Ok(())
        })
    }

    /// Sets the selling price to the lowest price reaching `target_margin`.
    ///
    /// ## Returns
    /// The applied price, or `None` (and no change) when the channel's
    /// percentage fees make the target unreachable.
    pub fn apply_suggested_price(
        &mut self,
        channel_type: ChannelType,
        target_margin: Percent,
    ) -> SessionResult<Option<Money>> {
        let fees = self.channel(channel_type)?.fees;
        let suggested = price_for_target_margin(
            self.cost.total_cost(),
            self.cost.tax_percent(),
            &fees,
            target_margin,
        )?;

        match suggested {
            Some(price) => {
                self.set_selling_price(channel_type, price)?;
                info!(
                    product_id = %self.product_id,
                    channel_type = %channel_type,
                    price = price.cents(),
                    target_bps = target_margin.bps(),
                    "Applied suggested price"
                );
            }
            None => {
                warn!(
                    product_id = %self.product_id,
                    channel_type = %channel_type,
                    target_bps = target_margin.bps(),
                    "Target margin unreachable"
                );
            }
        }

        Ok(suggested)
    }

    // =========================================================================
    // Computation
    // =========================================================================

    /// Comparison over the current working set.
    ///
    /// Served from the memo while cost and channels are unchanged since the
    /// last call.
    pub fn recompute(&mut self) -> SessionResult<ChannelComparison> {
        if let Some(memo) = &self.memo {
            if memo.cost == self.cost && memo.channels == self.channels {
                return Ok(memo.comparison.clone());
            }
        }

        let comparison = calculate_for_product(&self.cost, &self.channels)?;
        debug!(
            product_id = %self.product_id,
            enabled = comparison.total_channel_count,
            profitable = comparison.profitable_count,
            best = ?comparison.best_channel,
            "Recomputed channel comparison"
        );

        self.memo = Some(Memo {
            cost: self.cost,
            channels: self.channels.clone(),
            comparison: comparison.clone(),
        });
        Ok(comparison)
    }

    /// Whether the next `recompute()` is served from the memo.
    pub fn is_memoized(&self) -> bool {
        self.memo
            .as_ref()
            .is_some_and(|m| m.cost == self.cost && m.channels == self.channels)
    }

    // =========================================================================
    // Dirty Tracking
    // =========================================================================

    pub fn is_dirty(&self) -> bool {
        self.is_cost_dirty() || self.channels != self.baseline
    }

    pub fn is_cost_dirty(&self) -> bool {
        self.cost != self.baseline_cost
    }

    /// Channel types whose working configuration differs from the baseline.
    pub fn dirty_channels(&self) -> Vec<ChannelType> {
        self.channels
            .iter()
            .zip(&self.baseline)
            .filter(|(working, saved)| working != saved)
            .map(|(working, _)| working.channel_type)
            .collect()
    }

    /// Drops every unsaved edit.
    pub fn discard_changes(&mut self) {
        self.cost = self.baseline_cost;
        self.channels = self.baseline.clone();
        debug!(product_id = %self.product_id, "Discarded changes");
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Persists the session: the cost basis when it changed, then the full
    /// channel set.
    ///
    /// ## Errors
    /// `SessionError::SaveFailed`; the working set and the dirty flags are
    /// left exactly as they were. The cost and channel writes are separate
    /// store calls, so a failure on the channels can follow a stored cost;
    /// the cost then counts as saved.
    pub async fn save<S>(&mut self, store: &S) -> SessionResult<()>
    where
        S: ChannelStore + ?Sized,
    {
        if !self.is_dirty() {
            debug!(product_id = %self.product_id, "Nothing to save");
            return Ok(());
        }

        if self.is_cost_dirty() {
            store
                .update_cost(&self.product_id, &self.cost)
                .await
                .map_err(SessionError::SaveFailed)?;
            self.baseline_cost = self.cost;
        }

        let dirty = self.dirty_channels().len();
        let stored = store
            .replace_channels(&self.product_id, &self.channels)
            .await
            .map_err(|e| {
                warn!(product_id = %self.product_id, error = %e, "Save failed; edits kept");
                SessionError::SaveFailed(e)
            })?;

        let stored = ensure_all_channels(stored)?;
        self.channels = stored.clone();
        self.baseline = stored;

        info!(
            product_id = %self.product_id,
            dirty_channels = dirty,
            "Saved channel set"
        );
        Ok(())
    }

    /// Takes over the baselines of `saved`, a copy of this session that was
    /// saved while this one stayed editable.
    ///
    /// `sent` is the working set the copy held when its save started.
    /// Channels untouched since then become the stored representation;
    /// channels edited in the meantime keep the edit (and pick up the
    /// stored id) and stay dirty. A copy whose channel write never
    /// completed only contributes its cost baseline.
    pub(crate) fn absorb_save(&mut self, sent: &[SalesChannel], saved: &ChannelManager) {
        self.baseline_cost = saved.baseline_cost;
        if saved.baseline == self.baseline {
            return;
        }

        for ((working, sent), stored) in self.channels.iter_mut().zip(sent).zip(&saved.baseline) {
            if working == sent {
                *working = stored.clone();
            } else if working.id.is_empty() {
                working.id = stored.id.clone();
            }
        }
        self.baseline = saved.baseline.clone();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::testing::{FailingStore, MemoryStore};
    use chrono::Utc;
    use std::sync::atomic::Ordering;

    fn pricing() -> ProductPricing {
        let mut fba = create_default_channel(ChannelType::AmazonFba);
        fba.id = "ch-fba".to_string();
        fba.enabled = true;
        fba.selling_price = Money::from_cents(15_000);
        fba.fees.fulfillment_fee = Money::from_cents(1200);
        fba.fees.advertising_percent = Percent::from_whole(5);

        let mut site = create_default_channel(ChannelType::SiteProprio);
        site.id = "ch-site".to_string();
        site.enabled = true;
        site.selling_price = Money::from_cents(4000);

        ProductPricing {
            product_id: "p-1".to_string(),
            sku: "FONE-BT".to_string(),
            name: "Fone Bluetooth".to_string(),
            cost: ProductCost::new(Money::from_cents(5000), Money::zero(), Percent::from_whole(10)).unwrap(),
            channels: vec![fba, site],
            updated_at: Utc::now(),
        }
    }

    fn manager() -> ChannelManager {
        ChannelManager::new(pricing()).unwrap()
    }

    #[test]
    fn test_new_completes_channel_set_and_is_clean() {
        let m = manager();
        assert_eq!(m.channels().len(), ChannelType::ALL.len());
        for (channel, expected) in m.channels().iter().zip(ChannelType::ALL) {
            assert_eq!(channel.channel_type, expected);
        }
        assert_eq!(m.enabled_channels().count(), 2);
        assert!(!m.is_dirty());
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let mut p = pricing();
        p.channels.push(p.channels[0].clone());
        assert!(matches!(
            ChannelManager::new(p),
            Err(SessionError::Validation(ValidationError::DuplicateChannel(ChannelType::AmazonFba)))
        ));
    }

    #[test]
    fn test_recompute_matches_worked_examples() {
        let mut m = manager();
        let cmp = m.recompute().unwrap();

        let fba = &cmp.results[&ChannelType::AmazonFba];
        assert_eq!(fba.net_profit.cents(), 5300);
        assert_eq!(fba.profit_margin_percent.bps(), 3533);

        let site = &cmp.results[&ChannelType::SiteProprio];
        assert_eq!(site.net_profit.cents(), -1500);
        assert!(!site.is_profitable);

        assert_eq!(cmp.best_channel, Some(ChannelType::AmazonFba));
        assert_eq!(cmp.worst_channel, Some(ChannelType::SiteProprio));
    }

    #[test]
    fn test_recompute_memo_invalidated_by_edit() {
        let mut m = manager();
        assert!(!m.is_memoized());

        let first = m.recompute().unwrap();
        assert!(m.is_memoized());
        assert_eq!(m.recompute().unwrap(), first);

        m.set_selling_price(ChannelType::SiteProprio, Money::from_cents(9000)).unwrap();
        assert!(!m.is_memoized());

        let second = m.recompute().unwrap();
        assert_ne!(second, first);
        assert_eq!(second.best_channel, Some(ChannelType::AmazonFba));
        assert!(second.results[&ChannelType::SiteProprio].is_profitable);
    }

    #[test]
    fn test_rejected_edit_leaves_state_untouched() {
        let mut m = manager();
        let before = m.channels().to_vec();

        let err = m.set_selling_price(ChannelType::AmazonFba, Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ValidationError::Negative { .. })));

        let err = m
            .set_price_bounds(ChannelType::AmazonFba, Some(Money::from_cents(200)), Some(Money::from_cents(100)))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::PriceBoundsInverted { .. })
        ));

        assert!(m.set_name(ChannelType::Shopee, "   ").is_err());
        assert!(m.set_cost(Money::from_cents(-1), Money::zero(), Percent::zero()).is_err());

        assert_eq!(m.channels(), before.as_slice());
        assert!(!m.is_dirty());
    }

    #[test]
    fn test_update_fee() {
        let mut m = manager();

        m.update_fee(
            ChannelType::Shopee,
            FeeField::Commission,
            FeeValue::Percent(Percent::from_whole(18)),
        )
        .unwrap();
        assert_eq!(
            m.channel(ChannelType::Shopee).unwrap().fees.commission_percent.bps(),
            1800
        );

        // Shipping is not charged by a fulfilment channel.
        let err = m
            .update_fee(
                ChannelType::AmazonFba,
                FeeField::Shipping,
                FeeValue::Amount(Money::from_cents(1590)),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::FeeNotApplicable {
                channel: ChannelType::AmazonFba,
                field: FeeField::Shipping,
            })
        ));

        // Zero is always accepted.
        m.update_fee(ChannelType::AmazonFba, FeeField::Shipping, FeeValue::Amount(Money::zero()))
            .unwrap();

        // Wrong kind for the field.
        assert!(m
            .update_fee(ChannelType::Shopee, FeeField::FixedFee, FeeValue::Percent(Percent::from_whole(1)))
            .is_err());

        assert_eq!(m.dirty_channels(), vec![ChannelType::Shopee]);
    }

    #[test]
    fn test_set_fees_checks_applicability() {
        let mut m = manager();
        let fees = ChannelFees {
            fulfillment_fee: Money::from_cents(900),
            ..Default::default()
        };
        assert!(m.set_fees(ChannelType::AmazonFbm, fees).is_err());
        m.set_fees(ChannelType::MercadoLivreFull, fees).unwrap();
        assert_eq!(m.dirty_channels(), vec![ChannelType::MercadoLivreFull]);
    }

    #[test]
    fn test_reset_channel_keeps_id_and_enabled() {
        let mut m = manager();
        m.set_competitor_price(ChannelType::AmazonFba, Some(Money::from_cents(14_000))).unwrap();
        m.reset_channel(ChannelType::AmazonFba).unwrap();

        let fba = m.channel(ChannelType::AmazonFba).unwrap();
        assert_eq!(fba.id, "ch-fba");
        assert!(fba.enabled);
        assert_eq!(fba.fees, defaults_for(ChannelType::AmazonFba).defaults);
        assert_eq!(fba.competitor_price, None);
        assert_eq!(fba.selling_price, Money::zero());
    }

    #[test]
    fn test_apply_suggested_price() {
        let mut m = manager();
        let price = m
            .apply_suggested_price(ChannelType::AmazonFba, Percent::from_whole(20))
            .unwrap()
            .unwrap();
        assert_eq!(m.channel(ChannelType::AmazonFba).unwrap().selling_price, price);

        let cmp = m.recompute().unwrap();
        assert!(cmp.results[&ChannelType::AmazonFba].profit_margin_percent >= Percent::from_whole(20));

        // 15% commission + 90% target leaves nothing for costs.
        let before = m.channels().to_vec();
        let none = m
            .apply_suggested_price(ChannelType::AmazonFbm, Percent::from_whole(90))
            .unwrap();
        assert_eq!(none, None);
        assert_eq!(m.channels(), before.as_slice());
    }

    #[test]
    fn test_dirty_tracking_and_discard() {
        let mut m = manager();
        m.set_enabled(ChannelType::Shopee, true).unwrap();
        m.set_cost(Money::from_cents(6000), Money::zero(), Percent::from_whole(10)).unwrap();

        assert!(m.is_dirty());
        assert!(m.is_cost_dirty());
        assert_eq!(m.dirty_channels(), vec![ChannelType::Shopee]);

        m.discard_changes();
        assert!(!m.is_dirty());
        assert_eq!(m.cost().total_cost().cents(), 5000);
        assert!(!m.channel(ChannelType::Shopee).unwrap().enabled);

        // Setting a value back to the baseline is clean again.
        m.set_enabled(ChannelType::Shopee, true).unwrap();
        m.set_enabled(ChannelType::Shopee, false).unwrap();
        assert!(!m.is_dirty());
    }

    #[tokio::test]
    async fn test_load_and_save() {
        let store = MemoryStore::with(pricing());
        let mut m = ChannelManager::load(&store, "p-1").await.unwrap();

        m.set_enabled(ChannelType::Shopee, true).unwrap();
        m.set_selling_price(ChannelType::Shopee, Money::from_cents(12_000)).unwrap();
        m.set_cost(Money::from_cents(5500), Money::zero(), Percent::from_whole(10)).unwrap();
        m.save(&store).await.unwrap();

        assert!(!m.is_dirty());
        let shopee = m.channel(ChannelType::Shopee).unwrap();
        assert!(!shopee.id.is_empty());

        let stored = store.stored("p-1");
        assert_eq!(stored.channels, m.channels());
        assert_eq!(stored.cost.total_cost().cents(), 5500);

        // A clean session does not write.
        m.save(&store).await.unwrap();
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_save_preserves_edits() {
        let store = FailingStore(MemoryStore::with(pricing()));
        let mut m = ChannelManager::load(&store, "p-1").await.unwrap();

        m.set_selling_price(ChannelType::AmazonFba, Money::from_cents(16_000)).unwrap();
        let edited = m.channels().to_vec();

        let err = m.save(&store).await.unwrap_err();
        assert!(matches!(err, SessionError::SaveFailed(StoreError::Unavailable(_))));

        assert!(m.is_dirty());
        assert_eq!(m.dirty_channels(), vec![ChannelType::AmazonFba]);
        assert_eq!(m.channels(), edited.as_slice());
    }

    #[tokio::test]
    async fn test_absorb_save_keeps_concurrent_edits() {
        let store = MemoryStore::with(pricing());
        let mut live = ChannelManager::load(&store, "p-1").await.unwrap();
        live.set_enabled(ChannelType::Shopee, true).unwrap();
        live.set_enabled(ChannelType::AmazonFbm, true).unwrap();

        let mut copy = live.clone();
        let sent = copy.channels().to_vec();
        copy.save(&store).await.unwrap();

        // Edited while the copy was being saved.
        live.set_selling_price(ChannelType::Shopee, Money::from_cents(9990)).unwrap();
        live.absorb_save(&sent, &copy);

        assert_eq!(live.dirty_channels(), vec![ChannelType::Shopee]);
        let shopee = live.channel(ChannelType::Shopee).unwrap();
        assert_eq!(shopee.selling_price.cents(), 9990);
        assert_eq!(shopee.id, store.stored("p-1").channels[ChannelType::Shopee.ordinal()].id);
        assert!(!live.channel(ChannelType::AmazonFbm).unwrap().id.is_empty());
    }

    #[tokio::test]
    async fn test_absorb_failed_save_changes_nothing() {
        let store = FailingStore(MemoryStore::with(pricing()));
        let mut live = ChannelManager::load(&store, "p-1").await.unwrap();
        live.set_enabled(ChannelType::Shopee, true).unwrap();

        let mut copy = live.clone();
        let sent = copy.channels().to_vec();
        assert!(copy.save(&store).await.is_err());

        let before = live.channels().to_vec();
        live.absorb_save(&sent, &copy);
        assert_eq!(live.channels(), before.as_slice());
        assert_eq!(live.dirty_channels(), vec![ChannelType::Shopee]);
    }

    #[tokio::test]
    async fn test_load_unknown_product() {
        let store = MemoryStore::default();
        let err = ChannelManager::load(&store, "missing").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::LoadFailed {
                source: StoreError::ProductNotFound(_),
                ..
            }
        ));
    }
}
