use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, postgres::PgRow};

use crate::{
    BuyerId, CancelOutcome, CatalogItemId, LineItemRecord, Money, NewLineItem, NewOrder, OrderId,
    OrderRecord, OrderStatus, Result, ShippingAddress, StoreError,
    store::{OrderStore, OrderTransaction},
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    ///
    /// Connection acquisition limits (pool size, acquire timeout) are
    /// configured on the pool by the caller.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::debug!("order schema migrations applied");
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<OrderRecord> {
        let status: String = row.try_get("status")?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e: common::UnknownStatus| StoreError::CorruptRecord(e.to_string()))?;

        Ok(OrderRecord {
            id: OrderId::new(row.try_get("id")?),
            buyer_id: BuyerId::new(row.try_get::<String, _>("buyer_id")?),
            total: Money::from_cents(row.try_get("total_cents")?),
            status,
            shipping: ShippingAddress {
                name: row.try_get("shipping_name")?,
                address: row.try_get("shipping_address")?,
                city: row.try_get("shipping_city")?,
                state: row.try_get("shipping_state")?,
                zip: row.try_get("shipping_zip")?,
                country: row.try_get("shipping_country")?,
                phone: row.try_get("shipping_phone")?,
            },
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_line_item(row: PgRow) -> Result<LineItemRecord> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::CorruptRecord(format!("line item quantity {quantity}")))?;

        Ok(LineItemRecord {
            id: row.try_get("id")?,
            order_id: OrderId::new(row.try_get("order_id")?),
            catalog_item_id: CatalogItemId::new(row.try_get::<String, _>("catalog_item_id")?),
            quantity,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
        })
    }
}

/// A database transaction holding one pooled connection.
///
/// sqlx rolls the transaction back and returns the connection to the pool
/// when this value is dropped without [`OrderTransaction::commit`].
pub struct PostgresTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PostgresTransaction {
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderId> {
        let shipping = &order.shipping;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO orders (buyer_id, total_cents, status,
                shipping_name, shipping_address, shipping_city, shipping_state,
                shipping_zip, shipping_country, shipping_phone)
            VALUES ($1, 0, 'pending', $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(order.buyer_id.as_str())
        .bind(&shipping.name)
        .bind(&shipping.address)
        .bind(&shipping.city)
        .bind(&shipping.state)
        .bind(&shipping.zip)
        .bind(&shipping.country)
        .bind(&shipping.phone)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(OrderId::new(id))
    }

    async fn insert_line_item(
        &mut self,
        order_id: OrderId,
        item: NewLineItem,
    ) -> Result<LineItemRecord> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_items (order_id, catalog_item_id, quantity, unit_price_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(order_id.as_i64())
        .bind(item.catalog_item_id.as_str())
        .bind(i64::from(item.quantity))
        .bind(item.unit_price.cents())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::UnknownOrder(order_id)
            }
            _ => StoreError::Database(e),
        })?;

        Ok(LineItemRecord {
            id,
            order_id,
            catalog_item_id: item.catalog_item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
    }

    async fn update_total(&mut self, order_id: OrderId, total: Money) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET total_cents = $1 WHERE id = $2")
            .bind(total.cents())
            .bind(order_id.as_i64())
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::UnknownOrder(order_id));
        }
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        metrics::counter!("order_store_commits_total").increment(1);
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        metrics::counter!("order_store_rollbacks_total").increment(1);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    type Transaction = PostgresTransaction;

    async fn begin(&self) -> Result<PostgresTransaction> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTransaction { tx })
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, buyer_id, total_cents, status,
                shipping_name, shipping_address, shipping_city, shipping_state,
                shipping_zip, shipping_country, shipping_phone, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_line_items(&self, order_id: OrderId) -> Result<Vec<LineItemRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, catalog_item_id, quantity, unit_price_cents
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_line_item).collect()
    }

    async fn list_orders_by_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<OrderRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, buyer_id, total_cents, status,
                shipping_name, shipping_address, shipping_city, shipping_state,
                shipping_zip, shipping_country, shipping_phone, created_at
            FROM orders
            WHERE buyer_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(buyer_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_pending(&self, order_id: OrderId) -> Result<CancelOutcome> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE orders SET status = 'cancelled'
            WHERE id = $1 AND status = 'pending'
            RETURNING id
            "#,
        )
        .bind(order_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = if updated.is_some() {
            CancelOutcome::Cancelled
        } else {
            // Zero rows: classify without a second write.
            let status: Option<String> =
                sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
                    .bind(order_id.as_i64())
                    .fetch_optional(&mut *tx)
                    .await?;
            match status {
                None => CancelOutcome::NotFound,
                Some(s) => CancelOutcome::NotCancellable(s.parse().map_err(
                    |e: common::UnknownStatus| StoreError::CorruptRecord(e.to_string()),
                )?),
            }
        };

        tx.commit().await?;
        tracing::debug!(?outcome, "cancellation classified");
        Ok(outcome)
    }
}
