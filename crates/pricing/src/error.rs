//! Pricing error types.

use thiserror::Error;

/// Errors raised while setting up a price resolver.
///
/// Lookups themselves never fail; see [`crate::PriceResolution`].
#[derive(Debug, Error)]
pub enum PricingError {
    /// The catalog base URL cannot be used to build lookup URLs.
    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Convenience type alias for pricing results.
pub type Result<T> = std::result::Result<T, PricingError>;
