//! Row-level records for the `orders` and `order_items` tables.

use chrono::{DateTime, Utc};

use crate::{BuyerId, CatalogItemId, Money, OrderId, OrderStatus, ShippingAddress};

/// A persisted order header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub id: OrderId,
    pub buyer_id: BuyerId,
    pub total: Money,
    pub status: OrderStatus,
    pub shipping: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

/// A persisted line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemRecord {
    /// Row identifier; increases with insertion order.
    pub id: i64,
    pub order_id: OrderId,
    pub catalog_item_id: CatalogItemId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItemRecord {
    /// Returns `unit_price * quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Values for a new order header.
///
/// The store assigns the id and timestamp; status starts as `pending` and the
/// total as zero until [`crate::OrderTransaction::update_total`] runs.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_id: BuyerId,
    pub shipping: ShippingAddress,
}

/// Values for a new line item.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub catalog_item_id: CatalogItemId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Outcome of an atomic `pending -> cancelled` update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The order was pending and is now cancelled.
    Cancelled,
    /// No order exists with the given id.
    NotFound,
    /// The order exists but its status does not allow cancellation.
    NotCancellable(OrderStatus),
}
