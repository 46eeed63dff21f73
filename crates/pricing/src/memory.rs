//! In-memory price resolver for tests and local runs.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{CatalogItemId, Money};

use crate::resolver::{PriceResolution, PriceResolver, UnavailableReason};

#[derive(Debug, Default)]
struct InMemoryPricingState {
    prices: HashMap<CatalogItemId, Money>,
    offline: bool,
    lookups: Vec<CatalogItemId>,
}

/// In-memory price resolver.
///
/// Unknown items resolve as a catalog 404; going offline makes every lookup
/// fail as unreachable. Every lookup is recorded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceResolver {
    state: Arc<RwLock<InMemoryPricingState>>,
}

impl InMemoryPriceResolver {
    /// Creates a resolver with no known prices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver pre-loaded with prices.
    pub fn with_prices<I, K>(prices: I) -> Self
    where
        I: IntoIterator<Item = (K, Money)>,
        K: Into<CatalogItemId>,
    {
        let resolver = Self::new();
        for (item, price) in prices {
            resolver.set_price(item, price);
        }
        resolver
    }

    /// Sets or replaces the price of an item.
    pub fn set_price(&self, item: impl Into<CatalogItemId>, price: Money) {
        self.state.write().unwrap().prices.insert(item.into(), price);
    }

    /// Makes every lookup report the catalog as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state.write().unwrap().offline = offline;
    }

    /// Returns the number of lookups performed.
    pub fn lookup_count(&self) -> usize {
        self.state.read().unwrap().lookups.len()
    }

    /// Returns the looked-up items in call order.
    pub fn lookups(&self) -> Vec<CatalogItemId> {
        self.state.read().unwrap().lookups.clone()
    }
}

#[async_trait]
impl PriceResolver for InMemoryPriceResolver {
    async fn resolve(&self, item: &CatalogItemId) -> PriceResolution {
        let mut state = self.state.write().unwrap();
        state.lookups.push(item.clone());

        if state.offline {
            return PriceResolution::Unavailable(UnavailableReason::Transport(
                "catalog offline".to_string(),
            ));
        }

        match state.prices.get(item) {
            Some(price) => PriceResolution::Resolved(*price),
            None => PriceResolution::Unavailable(UnavailableReason::Status(404)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_item_resolves() {
        let resolver = InMemoryPriceResolver::with_prices([("SKU-1", Money::from_cents(1999))]);
        let resolution = resolver.resolve(&CatalogItemId::new("SKU-1")).await;
        assert_eq!(resolution, PriceResolution::Resolved(Money::from_cents(1999)));
    }

    #[tokio::test]
    async fn test_unknown_item_is_unavailable() {
        let resolver = InMemoryPriceResolver::new();
        let resolution = resolver.resolve(&CatalogItemId::new("SKU-404")).await;
        assert_eq!(
            resolution,
            PriceResolution::Unavailable(UnavailableReason::Status(404))
        );
        assert_eq!(resolution.price(), None);
    }

    #[tokio::test]
    async fn test_offline_hides_known_prices() {
        let resolver = InMemoryPriceResolver::with_prices([("SKU-1", Money::from_cents(100))]);
        resolver.set_offline(true);
        let resolution = resolver.resolve(&CatalogItemId::new("SKU-1")).await;
        assert!(matches!(
            resolution,
            PriceResolution::Unavailable(UnavailableReason::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_every_lookup_is_recorded() {
        let resolver = InMemoryPriceResolver::with_prices([("SKU-1", Money::from_cents(100))]);
        let item = CatalogItemId::new("SKU-1");
        resolver.resolve(&item).await;
        resolver.resolve(&item).await;
        assert_eq!(resolver.lookup_count(), 2);
        assert_eq!(resolver.lookups(), vec![item.clone(), item]);
    }
}
