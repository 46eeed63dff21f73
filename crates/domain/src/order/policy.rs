//! What to charge when the catalog cannot price a line.

use common::Money;
use thiserror::Error;

/// Fallback applied when a price lookup reports the catalog unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceFallbackPolicy {
    /// Use the client-supplied price; reject the order when there is none.
    #[default]
    RequireClientPrice,

    /// Use the client-supplied price, or zero when there is none.
    ClientPriceOrZero,
}

impl PriceFallbackPolicy {
    /// Returns the price to charge, or `None` if the order must be rejected.
    pub fn fallback(&self, client_price: Option<Money>) -> Option<Money> {
        match self {
            PriceFallbackPolicy::RequireClientPrice => client_price,
            PriceFallbackPolicy::ClientPriceOrZero => Some(client_price.unwrap_or_default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceFallbackPolicy::RequireClientPrice => "require-client-price",
            PriceFallbackPolicy::ClientPriceOrZero => "client-or-zero",
        }
    }
}

impl std::fmt::Display for PriceFallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price fallback policy: {0} (expected require-client-price or client-or-zero)")]
pub struct UnknownPolicy(pub String);

impl std::str::FromStr for PriceFallbackPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "require-client-price" => Ok(PriceFallbackPolicy::RequireClientPrice),
            "client-or-zero" => Ok(PriceFallbackPolicy::ClientPriceOrZero),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}
