//! Client-side key-value storage.
//!
//! The visitor's browser context owns one string-keyed store (the local
//! storage analogue) and one process-wide `storage` event. Writers update the
//! store and then fire the event; readers subscribe to the event and re-read
//! the keys they care about.
//!
//! Two backends implement [`KeyValueStore`]:
//!
//! - [`MemoryStore`] - lives as long as the process (default, tests)
//! - [`FileStore`] - a JSON object on disk that survives restarts

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::observe::{Listeners, Subscription};

/// Key holding the serialized session record.
pub const USER_KEY: &str = "user";

/// Errors raised by storage backends on write.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store contents could not be serialized.
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string-keyed, string-valued store.
///
/// Reads never fail: a backend that cannot produce a value reports the key
/// as absent.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to persist the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStore
// =============================================================================

/// Store persisted as a single JSON object file.
///
/// The whole object is rewritten on every change (write to a sibling
/// temporary file, then rename). A missing file opens as an empty store; an
/// unreadable or malformed file also opens empty and is overwritten by the
/// next write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut HashMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        change(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed store file");
            HashMap::new()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read store file");
            HashMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// =============================================================================
// Browser context
// =============================================================================

/// One visitor's storage: the key-value store plus its `storage` event.
///
/// Cheaply cloneable; clones share both the store and the event.
#[derive(Clone)]
pub struct BrowserContext {
    store: Arc<dyn KeyValueStore>,
    storage_event: Listeners,
}

impl BrowserContext {
    /// Create a context over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            storage_event: Listeners::new(),
        }
    }

    /// Create a context over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Listen for the `storage` event.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_storage(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.storage_event.subscribe(listener)
    }

    /// Fire the `storage` event.
    pub fn dispatch_storage_event(&self) {
        tracing::trace!(listeners = self.storage_event.len(), "Dispatching storage event");
        self.storage_event.notify();
    }

    /// Number of live `storage` listeners.
    #[must_use]
    pub fn storage_listener_count(&self) -> usize {
        self.storage_event.len()
    }
}

impl std::fmt::Debug for BrowserContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserContext")
            .field("storage_event", &self.storage_event)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get(USER_KEY), None);

        store.set(USER_KEY, "value").unwrap();
        assert_eq!(store.get(USER_KEY).as_deref(), Some("value"));

        store.remove(USER_KEY).unwrap();
        assert_eq!(store.get(USER_KEY), None);

        // Removing an absent key is fine
        store.remove(USER_KEY).unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path);
        store.set(USER_KEY, r#"{"name":"Ann","email":"a@x.com"}"#).unwrap();
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.get(USER_KEY).as_deref(),
            Some(r#"{"name":"Ann","email":"a@x.com"}"#)
        );

        reopened.remove(USER_KEY).unwrap();
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(USER_KEY), None);
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/storage.json");

        let store = FileStore::open(&path);
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_store_malformed_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get(USER_KEY), None);

        store.set("k", "v").unwrap();
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_storage_event_reaches_subscribers() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let context = BrowserContext::in_memory();
        let hits = Arc::new(AtomicUsize::new(0));
        let subscription = {
            let hits = Arc::clone(&hits);
            context.on_storage(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };

        context.dispatch_storage_event();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(context.storage_listener_count(), 1);

        drop(subscription);
        assert_eq!(context.storage_listener_count(), 0);
    }
}
