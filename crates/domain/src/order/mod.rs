//! Order creation, validation and lifecycle.

mod commands;
mod policy;
mod service;
mod validation;
mod view;

pub use commands::*;
pub use policy::{PriceFallbackPolicy, UnknownPolicy};
pub use service::OrderService;
pub use validation::{ValidatedLine, ValidatedOrder, ValidationError};
pub use view::{OrderDetails, OrderSummary};
