use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    BuyerId, CancelOutcome, LineItemRecord, Money, NewLineItem, NewOrder, OrderId, OrderRecord,
    OrderStatus, Result, StoreError,
    store::{OrderStore, OrderTransaction},
};

#[derive(Debug, Default)]
struct MemoryState {
    orders: BTreeMap<OrderId, OrderRecord>,
    line_items: Vec<LineItemRecord>,
    last_order_id: i64,
    last_line_item_id: i64,
    fail_on_line_item: Option<usize>,
}

/// In-memory order store implementation for testing.
///
/// Provides the same interface and visibility rules as the PostgreSQL
/// implementation: transaction writes are staged and applied on commit, and
/// identifiers, like database sequences, are never reused after a rollback.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `nth` (1-based) line item insert of every subsequently
    /// started transaction fail. `None` disables the failure.
    pub async fn set_fail_on_line_item(&self, nth: Option<usize>) {
        self.state.write().await.fail_on_line_item = nth;
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Returns the number of committed line items.
    pub async fn line_item_count(&self) -> usize {
        self.state.read().await.line_items.len()
    }

    /// Clears all orders and line items.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.orders.clear();
        state.line_items.clear();
    }
}

/// Transaction over an [`InMemoryOrderStore`].
pub struct InMemoryTransaction {
    state: Arc<RwLock<MemoryState>>,
    orders: Vec<OrderRecord>,
    line_items: Vec<LineItemRecord>,
    fail_on_line_item: Option<usize>,
}

impl InMemoryTransaction {
    fn staged_order_mut(&mut self, order_id: OrderId) -> Result<&mut OrderRecord> {
        self.orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or(StoreError::UnknownOrder(order_id))
    }
}

#[async_trait]
impl OrderTransaction for InMemoryTransaction {
    async fn insert_order(&mut self, order: NewOrder) -> Result<OrderId> {
        let id = {
            let mut state = self.state.write().await;
            state.last_order_id += 1;
            OrderId::new(state.last_order_id)
        };

        self.orders.push(OrderRecord {
            id,
            buyer_id: order.buyer_id,
            total: Money::zero(),
            status: OrderStatus::Pending,
            shipping: order.shipping,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn insert_line_item(
        &mut self,
        order_id: OrderId,
        item: NewLineItem,
    ) -> Result<LineItemRecord> {
        self.staged_order_mut(order_id)?;

        let position = self.line_items.len() + 1;
        if self.fail_on_line_item == Some(position) {
            return Err(StoreError::Backend(format!(
                "injected failure on line item {position}"
            )));
        }

        let id = {
            let mut state = self.state.write().await;
            state.last_line_item_id += 1;
            state.last_line_item_id
        };

        let record = LineItemRecord {
            id,
            order_id,
            catalog_item_id: item.catalog_item_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        };
        self.line_items.push(record.clone());
        Ok(record)
    }

    async fn update_total(&mut self, order_id: OrderId, total: Money) -> Result<()> {
        self.staged_order_mut(order_id)?.total = total;
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        let InMemoryTransaction {
            state,
            orders,
            line_items,
            ..
        } = self;

        let mut state = state.write().await;
        state.orders.extend(orders.into_iter().map(|o| (o.id, o)));
        state.line_items.extend(line_items);
        metrics::counter!("order_store_commits_total").increment(1);
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        metrics::counter!("order_store_rollbacks_total").increment(1);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<InMemoryTransaction> {
        let fail_on_line_item = self.state.read().await.fail_on_line_item;
        Ok(InMemoryTransaction {
            state: Arc::clone(&self.state),
            orders: Vec::new(),
            line_items: Vec::new(),
            fail_on_line_item,
        })
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.state.read().await.orders.get(&order_id).cloned())
    }

    async fn find_line_items(&self, order_id: OrderId) -> Result<Vec<LineItemRecord>> {
        let state = self.state.read().await;
        let mut items: Vec<_> = state
            .line_items
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.id);
        Ok(items)
    }

    async fn list_orders_by_buyer(&self, buyer_id: &BuyerId) -> Result<Vec<OrderRecord>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| &o.buyer_id == buyer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn cancel_pending(&self, order_id: OrderId) -> Result<CancelOutcome> {
        let mut state = self.state.write().await;
        let Some(order) = state.orders.get_mut(&order_id) else {
            return Ok(CancelOutcome::NotFound);
        };

        match order.status.cancel() {
            Some(next) => {
                order.status = next;
                Ok(CancelOutcome::Cancelled)
            }
            None => Ok(CancelOutcome::NotCancellable(order.status)),
        }
    }
}
