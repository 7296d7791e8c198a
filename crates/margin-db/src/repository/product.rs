//! # Product Repository
//!
//! Database operations for products and their cost basis.
//!
//! ## Column Mapping
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ products column              │ Product field                            │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ item_cost_cents      INTEGER │ cost.item_cost()      Money              │
//! │ packaging_cost_cents INTEGER │ cost.packaging_cost() Money              │
//! │ tax_bps              INTEGER │ cost.tax_percent()    Percent            │
//! │ sync_version         INTEGER │ bumped on every write                    │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Rows are read through [`ProductRow`] and re-validated into a
//! [`ProductCost`] on the way out, so a hand-edited row with a negative cost
//! surfaces as `DbError::Validation` instead of reaching the calculator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use margin_core::validation::{validate_sku, ValidationResult};
use margin_core::{Money, Percent, ProductCost, ValidationError, DEFAULT_TENANT_ID};

use crate::error::{DbError, DbResult};

// =============================================================================
// Product Record
// =============================================================================

/// A stored product: identity plus cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub tenant_id: String,
    pub sku: String,
    pub name: String,
    pub cost: ProductCost,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sync_version: i64,
}

impl Product {
    /// Builds a new, not yet stored product for the default tenant.
    /// Use [`Product::in_tenant`] for any other tenant.
    ///
    /// ## Errors
    /// Invalid SKU or empty name.
    pub fn new(sku: &str, name: &str, cost: ProductCost) -> ValidationResult<Self> {
        validate_sku(sku)?;
        if name.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }

        let now = Utc::now();
        Ok(Product {
            id: generate_product_id(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            sku: sku.trim().to_string(),
            name: name.trim().to_string(),
            cost,
            created_at: now,
            updated_at: now,
            sync_version: 0,
        })
    }

    /// Moves the (not yet stored) product to another tenant.
    pub fn in_tenant(mut self, tenant_id: &str) -> Self {
        self.tenant_id = tenant_id.to_string();
        self
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    tenant_id: String,
    sku: String,
    name: String,
    item_cost_cents: i64,
    packaging_cost_cents: i64,
    tax_bps: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    sync_version: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let cost = ProductCost::new(
            Money::from_cents(row.item_cost_cents),
            Money::from_cents(row.packaging_cost_cents),
            Percent::from_bps(row.tax_bps),
        )?;

        Ok(Product {
            id: row.id,
            tenant_id: row.tenant_id,
            sku: row.sku,
            name: row.name,
            cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
            sync_version: row.sync_version,
        })
    }
}

const PRODUCT_COLUMNS: &str = r#"
    id, tenant_id, sku, name,
    item_cost_cents, packaging_cost_cents, tax_bps,
    created_at, updated_at, sync_version
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations, scoped to one tenant.
///
/// SKU lookups, listings and counts only see the repository's tenant.
/// Product ids are globally unique, so lookups and updates by id are not
/// scoped.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products_for(&config.tenant_id);
/// let product = repo.get_by_sku("CANECA-300").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    tenant_id: String,
}

impl ProductRepository {
    /// Repository over the default tenant.
    pub fn new(pool: SqlitePool) -> Self {
        Self::for_tenant(pool, DEFAULT_TENANT_ID)
    }

    pub fn for_tenant(pool: SqlitePool, tenant_id: &str) -> Self {
        ProductRepository {
            pool,
            tenant_id: tenant_id.to_string(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Gets a product by its ID, whatever its tenant.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Gets a product by its SKU within the repository's tenant.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE sku = ?1 AND tenant_id = ?2");

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(sku.trim())
            .bind(&self.tenant_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists the tenant's products ordered by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE tenant_id = ?1 ORDER BY name, sku LIMIT ?2"
        );

        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&self.tenant_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Inserts a new product into the repository's tenant.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - SKU already exists for the tenant
    /// * `Err(DbError::Validation)` - the product belongs to another tenant
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        if product.tenant_id != self.tenant_id {
            return Err(ValidationError::InvalidFormat {
                field: "tenantId".to_string(),
                reason: format!("product belongs to tenant {}", product.tenant_id),
            }
            .into());
        }
        debug!(sku = %product.sku, tenant_id = %self.tenant_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, tenant_id, sku, name,
                item_cost_cents, packaging_cost_cents, tax_bps,
                created_at, updated_at, sync_version
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.tenant_id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.cost.item_cost().cents())
        .bind(product.cost.packaging_cost().cents())
        .bind(product.cost.tax_percent().bps())
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(product.sync_version)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.sku),
            other => other,
        })?;

        Ok(product.clone())
    }

    /// Replaces the cost basis of a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update_cost(&self, id: &str, cost: &ProductCost) -> DbResult<()> {
        debug!(
            product_id = %id,
            total_cost = cost.total_cost().cents(),
            "Updating product cost"
        );

        let result = sqlx::query(
            r#"
            UPDATE products SET
                item_cost_cents = ?2,
                packaging_cost_cents = ?3,
                tax_bps = ?4,
                updated_at = ?5,
                sync_version = sync_version + 1
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(cost.item_cost().cents())
        .bind(cost.packaging_cost().cents())
        .bind(cost.tax_percent().bps())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts the tenant's products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE tenant_id = ?1")
            .bind(&self.tenant_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn cost(item: i64) -> ProductCost {
        ProductCost::new(Money::from_cents(item), Money::from_cents(150), Percent::from_bps(725)).unwrap()
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_new_product_validates() {
        assert!(Product::new("KIT-01", "Kit", cost(100)).is_ok());
        assert!(Product::new("bad sku", "Kit", cost(100)).is_err());
        assert!(matches!(
            Product::new("KIT-01", "   ", cost(100)),
            Err(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let product = Product::new("CANECA-300", "Caneca 300ml", cost(3333)).unwrap();
        db.products().insert(&product).await.unwrap();

        let by_id = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "CANECA-300");
        assert_eq!(by_id.cost, product.cost);
        assert_eq!(by_id.sync_version, 0);

        let by_sku = db.products().get_by_sku("CANECA-300").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);

        assert!(db.products().get_by_id("nope").await.unwrap().is_none());
        assert!(db.products().get_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = db().await;
        let first = Product::new("DUP-1", "First", cost(100)).unwrap();
        let second = Product::new("DUP-1", "Second", cost(200)).unwrap();

        db.products().insert(&first).await.unwrap();
        let err = db.products().insert(&second).await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "DUP-1"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_cost_bumps_version() {
        let db = db().await;
        let product = Product::new("P-1", "Produto", cost(1000)).unwrap();
        db.products().insert(&product).await.unwrap();

        db.products().update_cost(&product.id, &cost(2000)).await.unwrap();

        let stored = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(stored.cost.item_cost().cents(), 2000);
        assert_eq!(stored.sync_version, 1);

        let err = db.products().update_cost("missing", &cost(1)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let db = db().await;
        for (sku, name) in [("B-1", "Bolsa"), ("A-1", "Agenda"), ("C-1", "Caderno")] {
            db.products().insert(&Product::new(sku, name, cost(100)).unwrap()).await.unwrap();
        }

        assert_eq!(db.products().count().await.unwrap(), 3);

        let names: Vec<String> = db.products().list(10).await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Agenda", "Bolsa", "Caderno"]);

        assert_eq!(db.products().list(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_tenants_are_isolated() {
        const OTHER: &str = "7d3c9a52-0b8e-4f61-9c2d-5e4a1b6f8c03";
        let db = db().await;
        let other = db.products_for(OTHER);

        let ours = Product::new("SKU-1", "Nosso", cost(100)).unwrap();
        let theirs = Product::new("SKU-1", "Deles", cost(200)).unwrap().in_tenant(OTHER);
        db.products().insert(&ours).await.unwrap();
        other.insert(&theirs).await.unwrap();

        let listed = other.list(10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Deles");
        assert_eq!(listed[0].tenant_id, OTHER);
        assert_eq!(other.count().await.unwrap(), 1);
        assert_eq!(db.products().count().await.unwrap(), 1);

        let found = other.get_by_sku("SKU-1").await.unwrap().unwrap();
        assert_eq!(found.id, theirs.id);
        assert!(db.products_for("00000000-0000-0000-0000-0000000000ff")
            .get_by_sku("SKU-1")
            .await
            .unwrap()
            .is_none());

        // A product is only inserted through its own tenant's repository.
        let stray = Product::new("SKU-2", "Perdido", cost(100)).unwrap();
        assert!(matches!(other.insert(&stray).await, Err(DbError::Validation(_))));
    }

    #[tokio::test]
    async fn test_corrupt_cost_row_surfaces_as_validation() {
        let db = db().await;
        let product = Product::new("NEG-1", "Negativo", cost(100)).unwrap();
        db.products().insert(&product).await.unwrap();

        // Bypass the repository and the CHECK constraints.
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE products SET item_cost_cents = -5 WHERE id = ?1")
            .bind(&product.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.products().get_by_id(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
