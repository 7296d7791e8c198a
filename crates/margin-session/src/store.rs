//! # Channel Store
//!
//! The persistence boundary of an editing session. The manager only ever
//! sees this trait; the SQLite [`Database`] is one implementation and tests
//! use in-memory ones.
//!
//! Replacement is all-or-nothing: `replace_channels` either stores the whole
//! set and returns the stored representation, or stores nothing.

use async_trait::async_trait;
use tracing::debug;

use margin_core::{ProductCost, ProductPricing, SalesChannel};
use margin_db::Database;

use crate::error::StoreError;

/// Async persistence boundary for product pricing.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Loads cost basis and channel set of a product.
    async fn load_pricing(&self, product_id: &str) -> Result<ProductPricing, StoreError>;

    /// Replaces the stored cost basis.
    async fn update_cost(&self, product_id: &str, cost: &ProductCost) -> Result<(), StoreError>;

    /// Replaces the full channel set and returns what was stored.
    async fn replace_channels(
        &self,
        product_id: &str,
        channels: &[SalesChannel],
    ) -> Result<Vec<SalesChannel>, StoreError>;
}

#[async_trait]
impl ChannelStore for Database {
    async fn load_pricing(&self, product_id: &str) -> Result<ProductPricing, StoreError> {
        debug!(product_id = %product_id, "Loading pricing from database");
        Ok(Database::load_pricing(self, product_id).await?)
    }

    async fn update_cost(&self, product_id: &str, cost: &ProductCost) -> Result<(), StoreError> {
        Ok(self.products().update_cost(product_id, cost).await?)
    }

    async fn replace_channels(
        &self,
        product_id: &str,
        channels: &[SalesChannel],
    ) -> Result<Vec<SalesChannel>, StoreError> {
        Ok(self.channels().replace_all(product_id, channels).await?)
    }
}

// =============================================================================
// Test Doubles
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use margin_core::{ChannelType, Money, Percent};
    use margin_db::{DbConfig, Product};

    #[tokio::test]
    async fn test_database_store_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cost = ProductCost::new(Money::from_cents(2000), Money::zero(), Percent::zero()).unwrap();
        let product = Product::new("SKU-1", "Produto", cost).unwrap();
        db.products().insert(&product).await.unwrap();

        let store: &dyn ChannelStore = &db;
        let mut pricing = store.load_pricing(&product.id).await.unwrap();
        pricing.channels[0].enabled = true;
        pricing.channels[0].selling_price = Money::from_cents(4990);

        let stored = store.replace_channels(&product.id, &pricing.channels).await.unwrap();
        assert!(stored.iter().all(|c| !c.id.is_empty()));

        let reloaded = store.load_pricing(&product.id).await.unwrap();
        assert_eq!(reloaded.channels, stored);
        assert_eq!(reloaded.channels[0].channel_type, ChannelType::SiteProprio);
        assert!(reloaded.channels[0].enabled);
    }

    #[tokio::test]
    async fn test_database_store_unknown_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store: &dyn ChannelStore = &db;
        assert!(matches!(
            store.load_pricing("nope").await,
            Err(StoreError::ProductNotFound(_))
        ));
    }
}
