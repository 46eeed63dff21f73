//! Order commands.
//!
//! Command fields mirror what a client may send, so every field is optional
//! until [`CreateOrder::validate`] has run.

use common::{BuyerId, CatalogItemId, OrderId};

/// Command to create a new order.
#[derive(Debug, Clone, Default)]
pub struct CreateOrder {
    /// The buyer placing the order.
    pub buyer_id: Option<BuyerId>,

    /// Line items in the order the client listed them.
    pub items: Option<Vec<LineItemInput>>,

    /// Shipping destination.
    pub shipping: Option<ShippingInput>,
}

impl CreateOrder {
    /// Creates a new CreateOrder command with every part present.
    pub fn new(
        buyer_id: impl Into<BuyerId>,
        items: Vec<LineItemInput>,
        shipping: ShippingInput,
    ) -> Self {
        Self {
            buyer_id: Some(buyer_id.into()),
            items: Some(items),
            shipping: Some(shipping),
        }
    }
}

/// One requested line of an order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemInput {
    pub catalog_item_id: Option<CatalogItemId>,

    pub quantity: Option<i64>,

    /// Client-supplied unit price in major units, used only as a fallback
    /// when the catalog cannot price the item.
    pub price: Option<f64>,
}

impl LineItemInput {
    /// Creates a line without a client price.
    pub fn new(catalog_item_id: impl Into<CatalogItemId>, quantity: i64) -> Self {
        Self {
            catalog_item_id: Some(catalog_item_id.into()),
            quantity: Some(quantity),
            price: None,
        }
    }

    /// Attaches a client-supplied fallback price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Shipping destination as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl ShippingInput {
    /// Returns the value of a field by its wire name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "zip" => &self.zip,
            "country" => &self.country,
            "phone" => &self.phone,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Command to cancel an order.
#[derive(Debug, Clone, Copy)]
pub struct CancelOrder {
    /// The order to cancel.
    pub order_id: OrderId,
}

impl CancelOrder {
    /// Creates a new CancelOrder command.
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}
