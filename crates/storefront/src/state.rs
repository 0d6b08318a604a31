//! Application state shared across handlers.

use std::sync::Arc;

use coffee_cup_hut_core::menu::StoreDomains;

use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the Storefront API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// The storefront's own hosts: the `myshopify` store, the public base
    /// URL, and the shop's primary domain as reported by the backend.
    #[must_use]
    pub fn domains(&self, primary_domain_url: &str) -> StoreDomains {
        let config = self.config();
        StoreDomains::new([
            config.shopify.store.as_str(),
            config.base_url.as_str(),
            primary_domain_url,
        ])
    }
}
