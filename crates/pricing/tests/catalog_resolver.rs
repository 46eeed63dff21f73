//! Catalog resolver tests against a throwaway HTTP catalog.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use common::{CatalogItemId, Money};
use pricing::{
    CatalogConfig, CatalogPriceResolver, PriceResolution, PriceResolver, UnavailableReason,
};

async fn product(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1" => Json(serde_json::json!({ "id": 1, "name": "Lamp", "price": 19.99 })).into_response(),
        "2" => Json(serde_json::json!({ "id": 2, "price": "5.50" })).into_response(),
        "3" => Json(serde_json::json!({ "id": 3, "name": "No price" })).into_response(),
        "4" => Json(serde_json::json!({ "id": 4, "price": "call us" })).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(serde_json::json!({ "price": 1.0 })).into_response()
        }
        "html" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Product not found" })),
        )
            .into_response(),
    }
}

async fn spawn_catalog() -> String {
    let app = Router::new().route("/products/{id}", get(product));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn resolver(base_url: String, timeout: Duration) -> CatalogPriceResolver {
    CatalogPriceResolver::new(&CatalogConfig { base_url, timeout }).unwrap()
}

async fn resolve(resolver: &CatalogPriceResolver, id: &str) -> PriceResolution {
    resolver.resolve(&CatalogItemId::new(id)).await
}

#[tokio::test]
async fn numeric_price_resolves() {
    let r = resolver(spawn_catalog().await, Duration::from_secs(2));
    assert_eq!(
        resolve(&r, "1").await,
        PriceResolution::Resolved(Money::from_cents(1999))
    );
}

#[tokio::test]
async fn numeric_string_price_resolves() {
    let r = resolver(spawn_catalog().await, Duration::from_secs(2));
    assert_eq!(
        resolve(&r, "2").await,
        PriceResolution::Resolved(Money::from_cents(550))
    );
}

#[tokio::test]
async fn missing_or_bad_price_is_malformed() {
    let r = resolver(spawn_catalog().await, Duration::from_secs(2));
    assert!(matches!(
        resolve(&r, "3").await,
        PriceResolution::Unavailable(UnavailableReason::Malformed(_))
    ));
    assert!(matches!(
        resolve(&r, "4").await,
        PriceResolution::Unavailable(UnavailableReason::Malformed(_))
    ));
    assert!(matches!(
        resolve(&r, "html").await,
        PriceResolution::Unavailable(UnavailableReason::Malformed(_))
    ));
}

#[tokio::test]
async fn non_success_status_is_unavailable() {
    let r = resolver(spawn_catalog().await, Duration::from_secs(2));
    assert_eq!(
        resolve(&r, "999").await,
        PriceResolution::Unavailable(UnavailableReason::Status(404))
    );
    assert_eq!(
        resolve(&r, "boom").await,
        PriceResolution::Unavailable(UnavailableReason::Status(500))
    );
}

#[tokio::test]
async fn slow_catalog_times_out() {
    let r = resolver(spawn_catalog().await, Duration::from_millis(50));
    assert_eq!(
        resolve(&r, "slow").await,
        PriceResolution::Unavailable(UnavailableReason::Timeout)
    );
}

#[tokio::test]
async fn unreachable_catalog_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let r = resolver(format!("http://{addr}"), Duration::from_secs(2));
    assert!(matches!(
        resolve(&r, "1").await,
        PriceResolution::Unavailable(UnavailableReason::Transport(_))
    ));
}
