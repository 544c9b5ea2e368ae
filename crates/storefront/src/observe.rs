//! Synchronous change notification.
//!
//! A [`Listeners`] registry holds callbacks that are invoked, in
//! subscription order, every time [`Listeners::notify`] is called. It is the
//! Rust shape of a DOM event dispatch: delivery is synchronous, carries no
//! payload, and a listener that wants fresh data re-reads the shared state it
//! observes.
//!
//! Subscribing returns a [`Subscription`]; dropping it unsubscribes, so a
//! view that is torn down cannot leave a listener behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback)>>,
}

impl Registry {
    fn entries(&self) -> MutexGuard<'_, Vec<(u64, Callback)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cloneable registry of change listeners.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct Listeners {
    registry: Arc<Registry>,
}

impl Listeners {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.entries().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every registered listener.
    ///
    /// The registry lock is released before listeners run, so a listener
    /// may subscribe, unsubscribe or notify again without deadlocking.
    pub fn notify(&self) {
        let snapshot: Vec<Callback> = self
            .registry
            .entries()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in snapshot {
            callback();
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.entries().len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

/// Handle to a registered listener. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.entries().retain(|(id, _)| *id != self.id);
        }
    }
}
