//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::catalog::{CatalogClient, CatalogError, CatalogSource};
use crate::config::StorefrontConfig;
use crate::page::Storefront;
use crate::storage::{BrowserContext, FileStore};

/// Application state shared across all handlers.
///
/// The server hosts a single visitor: one browser context with the navbar
/// and product page mounted over it. Handlers lock it for the duration of
/// one synchronous update or render and never across an `.await`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: Mutex<Storefront>,
}

impl AppState {
    /// Create the application state and start loading the catalog.
    ///
    /// The browser context is backed by `config.storage_path` when set and
    /// by memory otherwise. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = CatalogClient::new(&config.catalog)?;
        let context = config.storage_path.as_ref().map_or_else(
            BrowserContext::in_memory,
            |path| BrowserContext::new(Arc::new(FileStore::open(path))),
        );
        Ok(Self::with_context(config, context, catalog))
    }

    /// Create the application state over an existing browser context and
    /// catalog source.
    pub fn with_context<S: CatalogSource>(
        config: StorefrontConfig,
        context: BrowserContext,
        catalog: S,
    ) -> Self {
        let storefront = Storefront::new(context);
        storefront.mount_catalog(catalog);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront: Mutex::new(storefront),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Lock the visitor's storefront.
    pub fn storefront(&self) -> MutexGuard<'_, Storefront> {
        self.inner
            .storefront
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
