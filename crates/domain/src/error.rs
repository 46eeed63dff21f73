//! Domain error types.

use common::{OrderId, OrderStatus};
use order_store::StoreError;
use thiserror::Error;

use crate::order::ValidationError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request is malformed or incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order's current status does not allow the requested transition.
    #[error("Cannot cancel order with status: {current}")]
    InvalidTransition {
        order_id: OrderId,
        current: OrderStatus,
    },

    /// The store failed; any open transaction has been rolled back.
    #[error("Persistence failure: {0}")]
    Store(#[from] StoreError),
}
