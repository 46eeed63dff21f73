//! Request validation for order creation.

use common::{BuyerId, CatalogItemId, Money, ShippingAddress};
use thiserror::Error;

use super::commands::{CreateOrder, LineItemInput, ShippingInput};

/// A malformed or incomplete order request.
///
/// Messages name the offending field and are safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required top-level field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A required shipping field is missing or empty.
    #[error("Missing shipping field: {0}")]
    MissingShippingField(&'static str),

    /// A line item lacks a required field. Lines are numbered from 1.
    #[error("Line item {line} is missing {field}")]
    MissingLineField { line: usize, field: &'static str },

    /// Quantity is not a positive integer.
    #[error("Invalid quantity {quantity} for line item {line} (must be a positive integer)")]
    InvalidQuantity { line: usize, quantity: i64 },

    /// Client-supplied price is negative or not a finite number.
    #[error("Invalid price for line item {line} (must be a non-negative number)")]
    InvalidPrice { line: usize },

    /// The catalog could not price an item and the client supplied no price.
    #[error("No price available for catalog item {catalog_item_id}")]
    PriceUnavailable { catalog_item_id: CatalogItemId },

    /// The order total does not fit the monetary range.
    #[error("Order total exceeds the supported amount")]
    TotalOverflow,
}

/// An order request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub buyer_id: BuyerId,
    pub lines: Vec<ValidatedLine>,
    pub shipping: ShippingAddress,
}

/// A line that passed validation; its price is not resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedLine {
    pub catalog_item_id: CatalogItemId,
    pub quantity: u32,
    pub client_price: Option<Money>,
}

/// Shipping values are stored verbatim, so only absent or empty ones count as missing.
fn is_missing(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

impl CreateOrder {
    /// Validates the request, failing on the first problem found.
    ///
    /// Checks run in a fixed order: buyer, presence of items, shipping fields
    /// (in [`ShippingAddress::FIELDS`] order), then each line in input order.
    pub fn validate(self) -> Result<ValidatedOrder, ValidationError> {
        let buyer_id = self
            .buyer_id
            .filter(|b| !b.is_blank())
            .ok_or(ValidationError::MissingField("buyerId"))?;

        let items = self
            .items
            .filter(|items| !items.is_empty())
            .ok_or(ValidationError::MissingField("items"))?;

        let shipping = validate_shipping(self.shipping.unwrap_or_default())?;

        let lines = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| validate_line(index + 1, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedOrder {
            buyer_id,
            lines,
            shipping,
        })
    }
}

fn validate_shipping(input: ShippingInput) -> Result<ShippingAddress, ValidationError> {
    if let Some(field) = ShippingAddress::FIELDS
        .into_iter()
        .find(|field| is_missing(input.field(field)))
    {
        return Err(ValidationError::MissingShippingField(field));
    }

    // Every field is present past the check above.
    Ok(ShippingAddress {
        name: input.name.unwrap_or_default(),
        address: input.address.unwrap_or_default(),
        city: input.city.unwrap_or_default(),
        state: input.state.unwrap_or_default(),
        zip: input.zip.unwrap_or_default(),
        country: input.country.unwrap_or_default(),
        phone: input.phone.unwrap_or_default(),
    })
}

fn validate_line(line: usize, item: LineItemInput) -> Result<ValidatedLine, ValidationError> {
    let catalog_item_id = item
        .catalog_item_id
        .filter(|id| !id.is_blank())
        .ok_or(ValidationError::MissingLineField {
            line,
            field: "catalogItemId",
        })?;

    let quantity = item.quantity.ok_or(ValidationError::MissingLineField {
        line,
        field: "quantity",
    })?;
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(ValidationError::InvalidQuantity { line, quantity })?;

    let client_price = item
        .price
        .map(|price| Money::from_major(price).ok_or(ValidationError::InvalidPrice { line }))
        .transpose()?;

    Ok(ValidatedLine {
        catalog_item_id,
        quantity,
        client_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingInput {
        ShippingInput {
            name: Some("Ada".to_string()),
            address: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            zip: Some("62701".to_string()),
            country: Some("US".to_string()),
            phone: Some("555-0100".to_string()),
        }
    }

    fn valid() -> CreateOrder {
        CreateOrder::new("17", vec![LineItemInput::new("SKU-1", 2)], shipping())
    }

    #[test]
    fn test_valid_request_passes() {
        let order = valid().validate().unwrap();
        assert_eq!(order.buyer_id, BuyerId::new("17"));
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.lines[0].client_price, None);
        assert_eq!(order.shipping.phone, "555-0100");
    }

    #[test]
    fn test_missing_or_blank_buyer() {
        let mut cmd = valid();
        cmd.buyer_id = None;
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingField("buyerId")
        );

        let mut cmd = valid();
        cmd.buyer_id = Some(BuyerId::new("  "));
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingField("buyerId")
        );
    }

    #[test]
    fn test_missing_or_empty_items() {
        let mut cmd = valid();
        cmd.items = None;
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingField("items")
        );

        let mut cmd = valid();
        cmd.items = Some(vec![]);
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingField("items")
        );
    }

    #[test]
    fn test_buyer_is_checked_before_items() {
        let cmd = CreateOrder::default();
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingField("buyerId")
        );
    }

    #[test]
    fn test_missing_phone_is_named() {
        let mut cmd = valid();
        cmd.shipping.as_mut().unwrap().phone = None;
        let err = cmd.validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingShippingField("phone"));
        assert_eq!(err.to_string(), "Missing shipping field: phone");
    }

    #[test]
    fn test_first_missing_shipping_field_wins() {
        let mut cmd = valid();
        let s = cmd.shipping.as_mut().unwrap();
        s.phone = None;
        s.city = Some(String::new());
        s.zip = None;
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingShippingField("city")
        );
    }

    #[test]
    fn test_whitespace_shipping_values_are_kept() {
        let mut cmd = valid();
        cmd.shipping.as_mut().unwrap().state = Some(" ".to_string());
        let order = cmd.validate().unwrap();
        assert_eq!(order.shipping.state, " ");
    }

    #[test]
    fn test_absent_shipping_reports_name() {
        let mut cmd = valid();
        cmd.shipping = None;
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingShippingField("name")
        );
    }

    #[test]
    fn test_shipping_is_copied_verbatim() {
        let mut cmd = valid();
        cmd.shipping.as_mut().unwrap().address = Some("  1 Main St, Apt 2 ".to_string());
        let order = cmd.validate().unwrap();
        assert_eq!(order.shipping.address, "  1 Main St, Apt 2 ");
    }

    #[test]
    fn test_line_requires_catalog_item_and_quantity() {
        let mut cmd = valid();
        cmd.items = Some(vec![
            LineItemInput::new("SKU-1", 1),
            LineItemInput {
                catalog_item_id: None,
                quantity: Some(1),
                price: None,
            },
        ]);
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingLineField {
                line: 2,
                field: "catalogItemId"
            }
        );

        let mut cmd = valid();
        cmd.items = Some(vec![LineItemInput {
            catalog_item_id: Some(CatalogItemId::new("SKU-1")),
            quantity: None,
            price: None,
        }]);
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingLineField {
                line: 1,
                field: "quantity"
            }
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        for quantity in [0, -3, i64::from(u32::MAX) + 1] {
            let mut cmd = valid();
            cmd.items = Some(vec![LineItemInput::new("SKU-1", quantity)]);
            assert_eq!(
                cmd.validate().unwrap_err(),
                ValidationError::InvalidQuantity { line: 1, quantity }
            );
        }
    }

    #[test]
    fn test_client_price_is_converted_and_checked() {
        let mut cmd = valid();
        cmd.items = Some(vec![LineItemInput::new("SKU-1", 1).with_price(12.5)]);
        let order = cmd.validate().unwrap();
        assert_eq!(order.lines[0].client_price, Some(Money::from_cents(1250)));

        let mut cmd = valid();
        cmd.items = Some(vec![LineItemInput::new("SKU-1", 1).with_price(-0.01)]);
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::InvalidPrice { line: 1 }
        );
    }

    #[test]
    fn test_shipping_checked_before_lines() {
        let mut cmd = valid();
        cmd.items = Some(vec![LineItemInput::new("SKU-1", 0)]);
        cmd.shipping.as_mut().unwrap().country = None;
        assert_eq!(
            cmd.validate().unwrap_err(),
            ValidationError::MissingShippingField("country")
        );
    }
}
