//! Read-side shapes returned by the order service.

use common::{Money, OrderId};
use order_store::{LineItemRecord, OrderRecord};

/// Result of a successful order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub total: Money,
}

/// An order header with its line items in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: OrderRecord,
    pub items: Vec<LineItemRecord>,
}

impl OrderDetails {
    /// Recomputes the total from the line items.
    ///
    /// Equals `order.total` for every order written by the order service.
    pub fn items_total(&self) -> Option<Money> {
        self.items
            .iter()
            .try_fold(Money::zero(), |acc, item| acc.checked_add(item.line_total()?))
    }
}
