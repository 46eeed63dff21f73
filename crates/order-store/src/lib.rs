//! Persistence gateway for orders.
//!
//! Owns the `orders` and `order_items` tables. Writes go through an
//! [`OrderTransaction`] that is rolled back unless explicitly committed;
//! reads acquire a pooled connection per call.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use common::{BuyerId, CatalogItemId, Money, OrderId, OrderStatus, ShippingAddress};
pub use error::{Result, StoreError};
pub use memory::{InMemoryOrderStore, InMemoryTransaction};
pub use postgres::{PostgresOrderStore, PostgresTransaction};
pub use record::{CancelOutcome, LineItemRecord, NewLineItem, NewOrder, OrderRecord};
pub use store::{OrderStore, OrderTransaction};
