//! Order service: creation and lifecycle management.

use std::time::Instant;

use common::{BuyerId, Money, OrderId};
use order_store::{
    CancelOutcome, NewLineItem, NewOrder, OrderRecord, OrderStore, OrderTransaction,
};
use pricing::{PriceResolution, PriceResolver};

use crate::error::DomainError;

use super::{
    CancelOrder, CreateOrder, OrderDetails, OrderSummary, PriceFallbackPolicy, ValidatedLine,
    ValidatedOrder, ValidationError,
};

/// Service for managing orders.
///
/// Creation writes the order header and its line items in one store
/// transaction, pricing every line through the resolver. Lifecycle
/// operations read orders back and apply the `pending -> cancelled`
/// transition.
pub struct OrderService<S: OrderStore, R: PriceResolver> {
    store: S,
    resolver: R,
    fallback: PriceFallbackPolicy,
}

impl<S: OrderStore, R: PriceResolver> OrderService<S, R> {
    /// Creates a new order service with the default fallback policy.
    pub fn new(store: S, resolver: R) -> Self {
        Self {
            store,
            resolver,
            fallback: PriceFallbackPolicy::default(),
        }
    }

    /// Replaces the price fallback policy.
    pub fn with_fallback_policy(mut self, fallback: PriceFallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fallback_policy(&self) -> PriceFallbackPolicy {
        self.fallback
    }

    /// Validates and persists a new order.
    ///
    /// Nothing is written when validation fails. Once writing has started, any
    /// failure rolls back the header and every line item written so far.
    #[tracing::instrument(skip(self, cmd))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<OrderSummary, DomainError> {
        let start = Instant::now();

        let result = match cmd.validate() {
            Ok(order) => self.persist(order).await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(summary) => {
                metrics::counter!("orders_created_total").increment(1);
                metrics::histogram!("order_creation_duration_seconds")
                    .record(start.elapsed().as_secs_f64());
                tracing::info!(order_id = %summary.order_id, total = %summary.total, "order created");
            }
            Err(e) => {
                metrics::counter!("order_creation_failures_total").increment(1);
                tracing::warn!(error = %e, "order creation failed");
            }
        }

        result
    }

    async fn persist(&self, order: ValidatedOrder) -> Result<OrderSummary, DomainError> {
        let mut tx = self.store.begin().await?;

        match self.write(&mut tx, order).await {
            Ok(summary) => {
                tx.commit().await?;
                Ok(summary)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn write(
        &self,
        tx: &mut S::Transaction,
        order: ValidatedOrder,
    ) -> Result<OrderSummary, DomainError> {
        let order_id = tx
            .insert_order(NewOrder {
                buyer_id: order.buyer_id,
                shipping: order.shipping,
            })
            .await?;

        let mut total = Money::zero();
        for line in order.lines {
            let unit_price = self.price_line(order_id, &line).await?;
            total = unit_price
                .checked_mul(line.quantity)
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or(ValidationError::TotalOverflow)?;

            tx.insert_line_item(
                order_id,
                NewLineItem {
                    catalog_item_id: line.catalog_item_id,
                    quantity: line.quantity,
                    unit_price,
                },
            )
            .await?;
        }

        tx.update_total(order_id, total).await?;
        Ok(OrderSummary { order_id, total })
    }

    async fn price_line(
        &self,
        order_id: OrderId,
        line: &ValidatedLine,
    ) -> Result<Money, DomainError> {
        let reason = match self.resolver.resolve(&line.catalog_item_id).await {
            PriceResolution::Resolved(price) => return Ok(price),
            PriceResolution::Unavailable(reason) => reason,
        };

        metrics::counter!("order_price_fallbacks_total", "reason" => reason.label()).increment(1);

        match self.fallback.fallback(line.client_price) {
            Some(price) => {
                tracing::warn!(
                    %order_id,
                    catalog_item_id = %line.catalog_item_id,
                    %reason,
                    %price,
                    policy = %self.fallback,
                    "catalog price unavailable, charging fallback price"
                );
                Ok(price)
            }
            None => {
                tracing::warn!(
                    %order_id,
                    catalog_item_id = %line.catalog_item_id,
                    %reason,
                    "catalog price unavailable and no client price supplied"
                );
                Err(ValidationError::PriceUnavailable {
                    catalog_item_id: line.catalog_item_id.clone(),
                }
                .into())
            }
        }
    }

    /// Loads an order with its line items.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<OrderDetails, DomainError> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(DomainError::NotFound(order_id))?;
        let items = self.store.find_line_items(order_id).await?;

        Ok(OrderDetails { order, items })
    }

    /// Lists a buyer's orders, most recent first, without line items.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_for_buyer(
        &self,
        buyer_id: &BuyerId,
    ) -> Result<Vec<OrderRecord>, DomainError> {
        Ok(self.store.list_orders_by_buyer(buyer_id).await?)
    }

    /// Cancels a pending order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, cmd: CancelOrder) -> Result<(), DomainError> {
        let order_id = cmd.order_id;

        match self.store.cancel_pending(order_id).await? {
            CancelOutcome::Cancelled => {
                metrics::counter!("orders_cancelled_total").increment(1);
                tracing::info!(%order_id, "order cancelled");
                Ok(())
            }
            CancelOutcome::NotFound => Err(DomainError::NotFound(order_id)),
            CancelOutcome::NotCancellable(current) => {
                Err(DomainError::InvalidTransition { order_id, current })
            }
        }
    }
}
