//! HTTP API server with observability for the order service.
//!
//! Provides REST endpoints for order creation, lookup and cancellation,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{OrderService, PriceFallbackPolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use pricing::PriceResolver;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use error::ApiError;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, R>(state: Arc<AppState<S, R>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + 'static,
    R: PriceResolver + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S, R>))
        .route(
            "/orders/user/{buyer_id}",
            get(routes::orders::list_for_buyer::<S, R>),
        )
        .route("/orders/{id}", get(routes::orders::get::<S, R>))
        .route("/orders/{id}/cancel", put(routes::orders::cancel::<S, R>))
        .with_state(state)
        .merge(metrics_router)
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a store and a price resolver.
pub fn create_state<S, R>(
    store: S,
    resolver: R,
    fallback: PriceFallbackPolicy,
) -> Arc<AppState<S, R>>
where
    S: OrderStore,
    R: PriceResolver,
{
    let order_service = OrderService::new(store, resolver).with_fallback_policy(fallback);
    Arc::new(AppState { order_service })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
