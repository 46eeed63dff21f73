use async_trait::async_trait;

use crate::{
    BuyerId, CancelOutcome, LineItemRecord, Money, NewLineItem, NewOrder, OrderId, OrderRecord,
    Result,
};

/// A unit of work spanning the `orders` and `order_items` tables.
///
/// Writes made through a transaction are invisible to every other reader until
/// [`commit`](OrderTransaction::commit) succeeds. Dropping a transaction
/// without committing rolls it back and releases its connection.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Inserts a `pending` order header with a zero total and returns the
    /// store-generated id.
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderId>;

    /// Inserts a line item owned by `order_id`.
    async fn insert_line_item(
        &mut self,
        order_id: OrderId,
        item: NewLineItem,
    ) -> Result<LineItemRecord>;

    /// Overwrites the total of an order written in this transaction.
    async fn update_total(&mut self, order_id: OrderId, total: Money) -> Result<()>;

    /// Makes every write of this transaction durable and visible.
    async fn commit(self) -> Result<()>;

    /// Discards every write of this transaction.
    async fn rollback(self) -> Result<()>;
}

/// Persistence gateway for orders.
///
/// All implementations must be thread-safe (Send + Sync); one store is shared
/// by every concurrent request.
#[async_trait]
pub trait OrderStore: Send + Sync {
    type Transaction: OrderTransaction;

    /// Starts a transaction, acquiring a connection for its lifetime.
    async fn begin(&self) -> Result<Self::Transaction>;

    /// Fetches an order header.
    async fn find_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>>;

    /// Fetches the line items of an order in insertion order.
    async fn find_line_items(&self, order_id: OrderId) -> Result<Vec<LineItemRecord>>;

    /// Lists a buyer's order headers, most recently created first.
    async fn list_orders_by_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<OrderRecord>>;

    /// Atomically moves an order from `pending` to `cancelled`.
    ///
    /// The status guard is part of the update itself, so two concurrent
    /// cancellations of the same order can never both succeed.
    async fn cancel_pending(&self, order_id: OrderId) -> Result<CancelOutcome>;
}
