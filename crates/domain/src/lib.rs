//! Domain layer for the order service.
//!
//! This crate provides:
//! - Order commands and their validation rules
//! - The price fallback policy applied when the catalog cannot price a line
//! - `OrderService`, which writes orders atomically and manages their lifecycle

pub mod error;
pub mod order;

pub use common::{BuyerId, CatalogItemId, Money, OrderId, OrderStatus, ShippingAddress};
pub use error::DomainError;
pub use order::{
    CancelOrder, CreateOrder, LineItemInput, OrderDetails, OrderService, OrderSummary,
    PriceFallbackPolicy, ShippingInput, UnknownPolicy, ValidatedLine, ValidatedOrder,
    ValidationError,
};
