//! HTTP price resolver backed by the catalog service.

use std::time::Duration;

use async_trait::async_trait;
use common::{CatalogItemId, Money};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::{PricingError, Result};
use crate::resolver::{PriceResolution, PriceResolver, UnavailableReason};

/// Connection settings for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog service, e.g. `http://product-service:8002`.
    pub base_url: String,
    /// Upper bound for one lookup, connect and body included.
    pub timeout: Duration,
}

/// Resolves prices with `GET {base_url}/products/{id}`.
///
/// Expects a JSON object with a `price` field. Numbers and numeric strings
/// are accepted; anything else is reported as unavailable.
#[derive(Debug, Clone)]
pub struct CatalogPriceResolver {
    client: Client,
    base_url: Url,
}

impl CatalogPriceResolver {
    /// Builds a resolver with its own HTTP client.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| PricingError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(PricingError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn product_url(&self, item: &CatalogItemId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("products").push(item.as_str());
        }
        url
    }

    async fn lookup(&self, item: &CatalogItemId) -> PriceResolution {
        let response = match self.client.get(self.product_url(item)).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return PriceResolution::Unavailable(UnavailableReason::Timeout);
            }
            Err(e) => {
                return PriceResolution::Unavailable(UnavailableReason::Transport(e.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return PriceResolution::Unavailable(UnavailableReason::Status(status.as_u16()));
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                return PriceResolution::Unavailable(UnavailableReason::Timeout);
            }
            Err(e) => {
                return PriceResolution::Unavailable(UnavailableReason::Malformed(e.to_string()));
            }
        };

        match body.get("price").map(parse_price) {
            Some(Some(price)) => PriceResolution::Resolved(price),
            Some(None) => PriceResolution::Unavailable(UnavailableReason::Malformed(
                "price is not a non-negative number".to_string(),
            )),
            None => PriceResolution::Unavailable(UnavailableReason::Malformed(
                "missing price field".to_string(),
            )),
        }
    }
}

fn parse_price(value: &Value) -> Option<Money> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Money::from_major(amount)
}

#[async_trait]
impl PriceResolver for CatalogPriceResolver {
    #[tracing::instrument(skip(self), fields(catalog_item_id = %item))]
    async fn resolve(&self, item: &CatalogItemId) -> PriceResolution {
        let resolution = self.lookup(item).await;

        let outcome = match &resolution {
            PriceResolution::Resolved(price) => {
                tracing::debug!(%price, "resolved catalog price");
                "resolved"
            }
            PriceResolution::Unavailable(reason) => {
                tracing::debug!(%reason, "catalog price unavailable");
                reason.label()
            }
        };
        metrics::counter!("catalog_price_lookups_total", "outcome" => outcome).increment(1);

        resolution
    }
}
