//! Application state shared across handlers.

use std::sync::Arc;

use lungi_mart_core::Shopper;
use lungi_mart_core::types::ShopperId;

use crate::config::StorefrontConfig;
use crate::services::PaymentGateway;
use crate::store::{CatalogStore, OrderStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    orders: OrderStore,
    shoppers: Vec<Shopper>,
    payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: CatalogStore,
        shoppers: Vec<Shopper>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: OrderStore::new(),
                shoppers,
                payments,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }

    /// Look up a mock shopper profile by id.
    #[must_use]
    pub fn shopper(&self, id: ShopperId) -> Option<&Shopper> {
        self.inner.shoppers.iter().find(|s| s.id == id)
    }

    /// Get a reference to the payment gateway.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }
}
