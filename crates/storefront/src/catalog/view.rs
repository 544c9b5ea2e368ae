//! Product listing load state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use mealcart_core::{MealId, Product};
use tokio::task::JoinHandle;

use super::{CatalogError, CatalogSource};

/// Lifecycle of the listing: `Idle → Loading → Ready | Errored`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Not mounted yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// Listing available (possibly empty).
    Ready(Vec<Product>),
    /// Fetch failed; holds the inline message.
    Errored(&'static str),
}

impl LoadState {
    fn settle(result: Result<Vec<Product>, CatalogError>) -> Self {
        match result {
            Ok(products) => Self::Ready(products),
            Err(e) => {
                tracing::warn!(error = %e, "Catalog load failed");
                Self::Errored(e.user_message())
            }
        }
    }

    /// Products when ready, empty otherwise.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        match self {
            Self::Ready(products) => products,
            Self::Idle | Self::Loading | Self::Errored(_) => &[],
        }
    }
}

/// The listing of one mounted product page.
///
/// The fetch starts on the first [`mount`](Self::mount) and never again.
/// The spawned task only holds a weak handle to the state, so a response
/// that arrives after the view is dropped is discarded.
#[derive(Debug, Default)]
pub struct CatalogView {
    state: Arc<Mutex<LoadState>>,
}

impl CatalogView {
    /// An unmounted view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start loading from `source`.
    ///
    /// Returns the fetch task on the first call and `None` afterwards.
    /// Must be called from within a tokio runtime.
    pub fn mount<S>(&self, source: S) -> Option<JoinHandle<()>>
    where
        S: CatalogSource,
    {
        {
            let mut state = self.lock();
            if *state != LoadState::Idle {
                return None;
            }
            *state = LoadState::Loading;
        }

        let target: Weak<Mutex<LoadState>> = Arc::downgrade(&self.state);
        Some(tokio::spawn(async move {
            let next = LoadState::settle(source.fetch_products().await);
            match target.upgrade() {
                Some(state) => {
                    *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
                }
                None => tracing::debug!("Catalog view gone before fetch completed"),
            }
        }))
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.lock().clone()
    }

    /// Look a product up by id in the loaded listing.
    #[must_use]
    pub fn product(&self, id: &MealId) -> Option<Product> {
        self.lock()
            .products()
            .iter()
            .find(|product| &product.id == id)
            .cloned()
    }
}
