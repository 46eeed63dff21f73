//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{BuyerId, CatalogItemId, OrderId, OrderStatus, ShippingAddress};
use domain::{CancelOrder, CreateOrder, LineItemInput, OrderDetails, OrderService, ShippingInput};
use order_store::{LineItemRecord, OrderRecord, OrderStore};
use pricing::PriceResolver;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore, R: PriceResolver> {
    pub order_service: OrderService<S, R>,
}

// -- Request types --

/// A JSON string or number, kept as text.
///
/// Storefront clients send numeric ids and zip codes; other clients send
/// strings. Both are stored verbatim as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Integer(n) => n.to_string(),
            TextOrNumber::Float(n) => n.to_string(),
        }
    }
}

fn text(value: Option<TextOrNumber>) -> Option<String> {
    value.map(String::from)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(alias = "userId")]
    pub buyer_id: Option<TextOrNumber>,
    pub items: Option<Vec<LineItemRequest>>,
    pub shipping: Option<ShippingRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    #[serde(alias = "productId")]
    pub catalog_item_id: Option<TextOrNumber>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ShippingRequest {
    pub name: Option<TextOrNumber>,
    pub address: Option<TextOrNumber>,
    pub city: Option<TextOrNumber>,
    pub state: Option<TextOrNumber>,
    pub zip: Option<TextOrNumber>,
    pub country: Option<TextOrNumber>,
    pub phone: Option<TextOrNumber>,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(req: CreateOrderRequest) -> Self {
        CreateOrder {
            buyer_id: text(req.buyer_id).map(BuyerId::from),
            items: req
                .items
                .map(|items| items.into_iter().map(LineItemInput::from).collect()),
            shipping: req.shipping.map(ShippingInput::from),
        }
    }
}

impl From<LineItemRequest> for LineItemInput {
    fn from(req: LineItemRequest) -> Self {
        LineItemInput {
            catalog_item_id: text(req.catalog_item_id).map(CatalogItemId::from),
            quantity: req.quantity,
            price: req.price,
        }
    }
}

impl From<ShippingRequest> for ShippingInput {
    fn from(req: ShippingRequest) -> Self {
        ShippingInput {
            name: text(req.name),
            address: text(req.address),
            city: text(req.city),
            state: text(req.state),
            zip: text(req.zip),
            country: text(req.country),
            phone: text(req.phone),
        }
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub message: &'static str,
    pub order_id: OrderId,
    pub total_amount: f64,
}

/// An order header in the row shape the storefront reads.
///
/// Field names follow the `orders` columns: snake_case, with the shipping
/// snapshot flattened into `shipping_*` fields.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub user_id: BuyerId,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub shipping_name: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zip: String,
    pub shipping_country: String,
    pub shipping_phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        let ShippingAddress {
            name,
            address,
            city,
            state,
            zip,
            country,
            phone,
        } = order.shipping;

        Self {
            id: order.id,
            user_id: order.buyer_id,
            total_amount: order.total.as_major(),
            status: order.status,
            shipping_name: name,
            shipping_address: address,
            shipping_city: city,
            shipping_state: state,
            shipping_zip: zip,
            shipping_country: country,
            shipping_phone: phone,
            created_at: order.created_at,
        }
    }
}

/// A line item in the `order_items` row shape.
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: i64,
    pub order_id: OrderId,
    pub product_id: CatalogItemId,
    pub quantity: u32,
    pub price: f64,
}

impl From<LineItemRecord> for LineItemResponse {
    fn from(item: LineItemRecord) -> Self {
        Self {
            id: item.id,
            order_id: item.order_id,
            product_id: item.catalog_item_id,
            quantity: item.quantity,
            price: item.unit_price.as_major(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderDetailsResponse {
    #[serde(flatten)]
    pub order: OrderResponse,
    pub items: Vec<LineItemResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order.into(),
            items: details.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancelledResponse {
    pub message: &'static str,
    pub order_id: OrderId,
}

// -- Handlers --

/// POST /orders — validate, price and persist a new order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S, R>(
    State(state): State<Arc<AppState<S, R>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError>
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let Json(req) = payload?;
    let summary = state.order_service.create_order(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            message: "Order created",
            order_id: summary.order_id,
            total_amount: summary.total.as_major(),
        }),
    ))
}

/// GET /orders/user/{buyer_id} — list a buyer's orders, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_for_buyer<S, R>(
    State(state): State<Arc<AppState<S, R>>>,
    Path(buyer_id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let orders = state
        .order_service
        .list_orders_for_buyer(&BuyerId::from(buyer_id))
        .await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /orders/{id} — get an order with its line items.
#[tracing::instrument(skip(state))]
pub async fn get<S, R>(
    State(state): State<Arc<AppState<S, R>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderDetailsResponse>, ApiError>
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let order_id = parse_order_id(&id)?;
    let details = state.order_service.get_order(order_id).await?;

    Ok(Json(details.into()))
}

/// PUT /orders/{id}/cancel — cancel a pending order.
#[tracing::instrument(skip(state))]
pub async fn cancel<S, R>(
    State(state): State<Arc<AppState<S, R>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderCancelledResponse>, ApiError>
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let order_id = parse_order_id(&id)?;
    state
        .order_service
        .cancel_order(CancelOrder::new(order_id))
        .await?;

    Ok(Json(OrderCancelledResponse {
        message: "Order cancelled successfully",
        order_id,
    }))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid order id: {id}")))
}

#[cfg(test)]
mod tests {
    use common::Money;

    use super::*;

    #[test]
    fn test_request_accepts_numeric_ids_and_aliases() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "userId": 17,
            "items": [{"productId": 3, "quantity": 2, "price": 9.99}],
            "shipping": {"name": "Ada", "zip": 62701}
        }))
        .unwrap();

        let cmd = CreateOrder::from(req);
        assert_eq!(cmd.buyer_id, Some(BuyerId::new("17")));
        let items = cmd.items.unwrap();
        assert_eq!(items[0].catalog_item_id, Some(CatalogItemId::new("3")));
        assert_eq!(items[0].quantity, Some(2));
        assert_eq!(items[0].price, Some(9.99));
        let shipping = cmd.shipping.unwrap();
        assert_eq!(shipping.zip.as_deref(), Some("62701"));
        assert_eq!(shipping.phone, None);
    }

    #[test]
    fn test_request_accepts_canonical_names() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "buyerId": "buyer-1",
            "items": [{"catalogItemId": "SKU-1", "quantity": 1}]
        }))
        .unwrap();

        let cmd = CreateOrder::from(req);
        assert_eq!(cmd.buyer_id, Some(BuyerId::new("buyer-1")));
        assert!(cmd.shipping.is_none());
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("42").unwrap(), OrderId::new(42));
        assert!(matches!(
            parse_order_id("abc"),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid order id: abc"
        ));
    }

    #[test]
    fn test_details_response_uses_row_shape() {
        let details = OrderDetails {
            order: OrderRecord {
                id: OrderId::new(5),
                buyer_id: BuyerId::new("17"),
                total: Money::from_cents(2599),
                status: OrderStatus::Pending,
                shipping: ShippingAddress {
                    name: "Ada".to_string(),
                    address: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    state: "IL".to_string(),
                    zip: "62701".to_string(),
                    country: "US".to_string(),
                    phone: "555-0100".to_string(),
                },
                created_at: Utc::now(),
            },
            items: vec![LineItemRecord {
                id: 9,
                order_id: OrderId::new(5),
                catalog_item_id: CatalogItemId::new("SKU-1"),
                quantity: 1,
                unit_price: Money::from_cents(2599),
            }],
        };

        let json = serde_json::to_value(OrderDetailsResponse::from(details)).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["user_id"], "17");
        assert_eq!(json["total_amount"], 25.99);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["shipping_name"], "Ada");
        assert_eq!(json["shipping_city"], "Springfield");
        assert_eq!(json["shipping_phone"], "555-0100");
        assert!(json["created_at"].as_str().is_some());
        assert!(json.get("shipping").is_none());
        assert_eq!(json["items"][0]["order_id"], 5);
        assert_eq!(json["items"][0]["product_id"], "SKU-1");
        assert_eq!(json["items"][0]["quantity"], 1);
        assert_eq!(json["items"][0]["price"], 25.99);
    }
}
