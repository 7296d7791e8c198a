//! # Sales Channel Repository
//!
//! Stores the per-product channel configurations.
//!
//! ## Full Replacement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  replace_all(product_id, channels)                                      │
//! │                                                                         │
//! │  validate every channel ──► complete to one row per ChannelType        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    UPDATE products  (updated_at, sync_version + 1) ── 0 rows? NotFound │
//! │    DELETE FROM sales_channels WHERE product_id = ?                      │
//! │    INSERT × 9  (empty ids get a fresh UUID)                             │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stored representation (ids filled, enumeration order)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure anywhere rolls the whole set back; a product never ends up with
//! half of an edit session persisted.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use margin_core::validation::{validate_channel, validate_channel_numbers};
use margin_core::{ensure_all_channels, ChannelFees, ChannelType, Money, Percent, SalesChannel};

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct ChannelRow {
    id: String,
    channel_type: ChannelType,
    name: String,
    enabled: bool,
    selling_price_cents: i64,
    commission_bps: i64,
    fixed_fee_cents: i64,
    shipping_cost_cents: i64,
    fulfillment_fee_cents: i64,
    advertising_bps: i64,
    other_fees_cents: i64,
    min_price_cents: Option<i64>,
    max_price_cents: Option<i64>,
    competitor_price_cents: Option<i64>,
}

impl TryFrom<ChannelRow> for SalesChannel {
    type Error = DbError;

    fn try_from(row: ChannelRow) -> Result<Self, Self::Error> {
        let channel = SalesChannel {
            id: row.id,
            channel_type: row.channel_type,
            name: row.name,
            enabled: row.enabled,
            selling_price: Money::from_cents(row.selling_price_cents),
            fees: ChannelFees {
                commission_percent: Percent::from_bps(row.commission_bps),
                fixed_fee: Money::from_cents(row.fixed_fee_cents),
                shipping_cost: Money::from_cents(row.shipping_cost_cents),
                fulfillment_fee: Money::from_cents(row.fulfillment_fee_cents),
                advertising_percent: Percent::from_bps(row.advertising_bps),
                other_fees: Money::from_cents(row.other_fees_cents),
            },
            min_price: row.min_price_cents.map(Money::from_cents),
            max_price: row.max_price_cents.map(Money::from_cents),
            competitor_price: row.competitor_price_cents.map(Money::from_cents),
        };

        validate_channel_numbers(&channel)?;
        Ok(channel)
    }
}

/// Repository for sales channel rows.
#[derive(Debug, Clone)]
pub struct ChannelRepository {
    pool: SqlitePool,
}

impl ChannelRepository {
    /// Creates a new ChannelRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ChannelRepository { pool }
    }

    /// Stored channels of a product in enumeration order.
    ///
    /// Only stored rows are returned; use `Database::load_pricing` for the
    /// completed set.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<SalesChannel>> {
        let rows = sqlx::query_as::<_, ChannelRow>(
            r#"
            SELECT
                id, channel_type, name, enabled,
                selling_price_cents,
                commission_bps, fixed_fee_cents, shipping_cost_cents,
                fulfillment_fee_cents, advertising_bps, other_fees_cents,
                min_price_cents, max_price_cents, competitor_price_cents
            FROM sales_channels
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        let mut channels = rows
            .into_iter()
            .map(SalesChannel::try_from)
            .collect::<DbResult<Vec<_>>>()?;
        channels.sort_by_key(|c| c.channel_type);

        Ok(channels)
    }

    /// Replaces every channel of a product in one transaction.
    ///
    /// ## Returns
    /// The stored set: one channel per `ChannelType` in enumeration order,
    /// every id filled.
    ///
    /// ## Errors
    /// * `DbError::Validation` - invalid or duplicate channel; nothing written
    /// * `DbError::NotFound` - unknown product; nothing written
    pub async fn replace_all(
        &self,
        product_id: &str,
        channels: &[SalesChannel],
    ) -> DbResult<Vec<SalesChannel>> {
        for channel in channels {
            validate_channel(channel)?;
        }
        let channels = ensure_all_channels(channels.to_vec())?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();

        let touched = sqlx::query(
            r#"
            UPDATE products SET
                updated_at = ?2,
                sync_version = sync_version + 1
            WHERE id = ?1
            "#,
        )
        .bind(product_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product_id));
        }

        sqlx::query("DELETE FROM sales_channels WHERE product_id = ?1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(channels.len());
        for mut channel in channels {
            if channel.id.is_empty() {
                channel.id = Uuid::new_v4().to_string();
            }

            sqlx::query(
                r#"
                INSERT INTO sales_channels (
                    id, product_id, channel_type, name, enabled,
                    selling_price_cents,
                    commission_bps, fixed_fee_cents, shipping_cost_cents,
                    fulfillment_fee_cents, advertising_bps, other_fees_cents,
                    min_price_cents, max_price_cents, competitor_price_cents,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                "#,
            )
            .bind(&channel.id)
            .bind(product_id)
            .bind(channel.channel_type)
            .bind(&channel.name)
            .bind(channel.enabled)
            .bind(channel.selling_price.cents())
            .bind(channel.fees.commission_percent.bps())
            .bind(channel.fees.fixed_fee.cents())
            .bind(channel.fees.shipping_cost.cents())
            .bind(channel.fees.fulfillment_fee.cents())
            .bind(channel.fees.advertising_percent.bps())
            .bind(channel.fees.other_fees.cents())
            .bind(channel.min_price.map(|m| m.cents()))
            .bind(channel.max_price.map(|m| m.cents()))
            .bind(channel.competitor_price.map(|m| m.cents()))
            .bind(now)
            .execute(&mut *tx)
            .await?;

            stored.push(channel);
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            product_id = %product_id,
            channels = stored.len(),
            enabled = stored.iter().filter(|c| c.enabled).count(),
            "Replaced channel set"
        );

        Ok(stored)
    }

    /// Number of stored channel rows for a product.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        debug!(product_id = %product_id, "Counting channels");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales_channels WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
