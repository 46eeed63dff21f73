//! Shared identifiers and value types for the order service.

mod money;
mod shipping;
mod status;
mod types;

pub use money::Money;
pub use shipping::ShippingAddress;
pub use status::{OrderStatus, UnknownStatus};
pub use types::{BuyerId, CatalogItemId, OrderId};
