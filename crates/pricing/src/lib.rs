//! Price resolution for order line items.
//!
//! A [`PriceResolver`] turns a catalog item identifier into an authoritative
//! unit price, or reports that no price is available so the caller can apply
//! its fallback policy.

pub mod catalog;
pub mod error;
pub mod memory;
pub mod resolver;

pub use catalog::{CatalogConfig, CatalogPriceResolver};
pub use error::PricingError;
pub use memory::InMemoryPriceResolver;
pub use resolver::{PriceResolution, PriceResolver, UnavailableReason};
