//! Application state shared across handlers.

use std::sync::Arc;

use ecostore_core::PricingPolicy;

use crate::config::StorefrontConfig;
use crate::db::Database;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration and the in-memory
/// store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    db: Database,
}

impl AppState {
    /// Create state over an empty store.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_database(config, Database::new())
    }

    /// Create state over an existing store.
    #[must_use]
    pub fn with_database(config: StorefrontConfig, db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, db }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the in-memory store.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Store-wide pricing rules.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }
}
