//! Shared state container for the cart and favorites.
//!
//! [`AppStore`] owns two append-only collections of products and the toast
//! feed. Views read the collections through accessors, mutate them only by
//! dispatching an [`Action`], and can subscribe to be told after every
//! change. Badge counts are read from here at render time; nothing keeps a
//! second copy.
//!
//! Each action that changes a collection also queues exactly one success
//! toast, so every mounted view learns about the change through its own
//! [`ToastReader`].

mod toast;

pub use toast::{Toast, ToastFeed, ToastLevel, ToastReader};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use mealcart_core::Product;

use crate::observe::{Listeners, Subscription};

/// Toast queued when a product lands in the cart.
pub const CART_ADDED_MESSAGE: &str = "Product added to cart successfully!";

/// Toast queued when a product lands in the favorites.
pub const FAVORITE_ADDED_MESSAGE: &str = "Product added to favorites successfully!";

/// Mutations the container accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Append a product to the cart.
    AddProduct(Product),
    /// Append a product to the favorites.
    AddFavorite(Product),
}

/// Cart slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductsState {
    pub items: Vec<Product>,
}

/// Favorites slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteState {
    pub items: Vec<Product>,
}

/// Everything the container holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub products: ProductsState,
    pub favorite: FavoriteState,
}

/// Apply `action` and return the toast message it produces.
fn reduce(state: &mut RootState, action: Action) -> &'static str {
    match action {
        Action::AddProduct(product) => {
            state.products.items.push(product);
            CART_ADDED_MESSAGE
        }
        Action::AddFavorite(product) => {
            state.favorite.items.push(product);
            FAVORITE_ADDED_MESSAGE
        }
    }
}

struct AppStoreInner {
    state: RwLock<RootState>,
    listeners: Listeners,
    toasts: ToastFeed,
}

/// The container. Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<AppStoreInner>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    /// Create a container with empty collections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AppStoreInner {
                state: RwLock::new(RootState::default()),
                listeners: Listeners::new(),
                toasts: ToastFeed::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RootState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply an action, queue its toast, then notify subscribers.
    pub fn dispatch(&self, action: Action) {
        let message = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let message = reduce(&mut state, action);
            tracing::debug!(
                cart = state.products.items.len(),
                favorites = state.favorite.items.len(),
                "State updated"
            );
            message
        };
        self.inner.toasts.success(message);
        self.inner.listeners.notify();
    }

    /// Snapshot of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> RootState {
        self.read().clone()
    }

    /// Products in the cart, in insertion order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<Product> {
        self.read().products.items.clone()
    }

    /// Number of products in the cart.
    #[must_use]
    pub fn cart_len(&self) -> usize {
        self.read().products.items.len()
    }

    /// Favorite products, in insertion order.
    #[must_use]
    pub fn favorite_items(&self) -> Vec<Product> {
        self.read().favorite.items.clone()
    }

    /// Number of favorite products.
    #[must_use]
    pub fn favorites_len(&self) -> usize {
        self.read().favorite.items.len()
    }

    /// Be told after every dispatched action.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// The toast feed shared by every view of this container.
    #[must_use]
    pub fn toasts(&self) -> &ToastFeed {
        &self.inner.toasts
    }
}

impl std::fmt::Debug for AppStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStore")
            .field("state", &*self.read())
            .field("listeners", &self.inner.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn product(id: &str) -> Product {
        Product::new(id, format!("Meal {id}"), format!("https://img/{id}.jpg"))
    }

    #[test]
    fn test_add_product_appends_without_dedupe() {
        let store = AppStore::new();
        store.dispatch(Action::AddProduct(product("1")));
        store.dispatch(Action::AddProduct(product("1")));

        assert_eq!(store.cart_len(), 2);
        assert_eq!(store.favorites_len(), 0);
        assert_eq!(store.cart_items(), vec![product("1"), product("1")]);
    }

    #[test]
    fn test_collections_are_independent() {
        let store = AppStore::new();
        store.dispatch(Action::AddFavorite(product("7")));

        assert_eq!(store.favorites_len(), 1);
        assert_eq!(store.cart_len(), 0);
        assert_eq!(store.snapshot().favorite.items, vec![product("7")]);
    }

    #[test]
    fn test_every_action_queues_one_toast() {
        let store = AppStore::new();
        let mut reader = store.toasts().reader();

        store.dispatch(Action::AddProduct(product("1")));
        store.dispatch(Action::AddFavorite(product("2")));

        let messages: Vec<String> = reader.take().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec![CART_ADDED_MESSAGE, FAVORITE_ADDED_MESSAGE]);
    }

    #[test]
    fn test_subscribers_observe_fresh_state() {
        let store = AppStore::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let _subscription = {
            let seen = Arc::clone(&seen);
            let observed = store.clone();
            store.subscribe(move || {
                seen.store(observed.cart_len(), Ordering::SeqCst);
            })
        };

        store.dispatch(Action::AddProduct(product("1")));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        store.dispatch(Action::AddProduct(product("2")));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
