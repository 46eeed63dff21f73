//! Shipping destination snapshot.

use serde::{Deserialize, Serialize};

/// Shipping destination copied verbatim onto an order at creation time.
///
/// Never re-validated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

impl ShippingAddress {
    /// Field names in the order they are validated and reported.
    pub const FIELDS: [&'static str; 7] =
        ["name", "address", "city", "state", "zip", "country", "phone"];
}
