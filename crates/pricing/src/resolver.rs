//! Price resolver trait.

use async_trait::async_trait;
use common::{CatalogItemId, Money};
use thiserror::Error;

/// Why a price could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnavailableReason {
    /// The lookup did not finish within the configured timeout.
    #[error("catalog lookup timed out")]
    Timeout,

    /// The catalog could not be reached.
    #[error("catalog unreachable: {0}")]
    Transport(String),

    /// The catalog answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(u16),

    /// The response body carried no usable `price` field.
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

impl UnavailableReason {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            UnavailableReason::Timeout => "timeout",
            UnavailableReason::Transport(_) => "transport",
            UnavailableReason::Status(_) => "status",
            UnavailableReason::Malformed(_) => "malformed",
        }
    }
}

/// Result of a price lookup.
///
/// Lookup failures are a normal outcome, not an error: callers are expected
/// to apply a fallback policy on [`PriceResolution::Unavailable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceResolution {
    Resolved(Money),
    Unavailable(UnavailableReason),
}

impl PriceResolution {
    /// Returns the resolved price, if any.
    pub fn price(&self) -> Option<Money> {
        match self {
            PriceResolution::Resolved(price) => Some(*price),
            PriceResolution::Unavailable(_) => None,
        }
    }
}

/// Source of authoritative unit prices.
///
/// No caching is implied: each call is an independent lookup.
#[async_trait]
pub trait PriceResolver: Send + Sync {
    /// Looks up the current unit price of a catalog item.
    async fn resolve(&self, item: &CatalogItemId) -> PriceResolution;
}
