//! Visitor session: the `user` entry and the navbar's view of it.
//!
//! [`SessionStore`] is the single source of truth for who is logged in. It
//! reads and writes the `user` key of the visitor's [`BrowserContext`] and
//! fires the `storage` event after every change.
//!
//! [`SessionMonitor`] is the navbar's identity state. It reads the store on
//! mount and again on every `storage` event, so every mounted monitor
//! follows a login or logout performed anywhere in the same context.

use std::sync::{Arc, PoisonError, RwLock};

use mealcart_core::SessionRecord;

use crate::observe::Subscription;
use crate::storage::{BrowserContext, KeyValueStore, StorageError, USER_KEY};

/// Read/write access to the visitor's session record.
#[derive(Clone, Debug)]
pub struct SessionStore {
    context: BrowserContext,
}

impl SessionStore {
    /// Create a session store over a browser context.
    #[must_use]
    pub const fn new(context: BrowserContext) -> Self {
        Self { context }
    }

    /// The browser context this store reads from.
    #[must_use]
    pub const fn context(&self) -> &BrowserContext {
        &self.context
    }

    /// The logged-in visitor, read fresh from storage.
    ///
    /// A missing or malformed entry reads as `None`.
    #[must_use]
    pub fn current(&self) -> Option<SessionRecord> {
        read_record(self.context.store().as_ref())
    }

    /// Persist `record` and fire the `storage` event.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write. No event fires in
    /// that case.
    pub fn write(&self, record: &SessionRecord) -> Result<(), StorageError> {
        self.context.store().set(USER_KEY, &record.encode())?;
        self.context.dispatch_storage_event();
        Ok(())
    }

    /// Remove the record and fire the `storage` event.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal. No event fires in
    /// that case.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.context.store().remove(USER_KEY)?;
        self.context.dispatch_storage_event();
        Ok(())
    }
}

fn read_record(store: &dyn KeyValueStore) -> Option<SessionRecord> {
    let raw = store.get(USER_KEY)?;
    let record = SessionRecord::decode(&raw);
    if record.is_none() {
        tracing::debug!("Stored user entry is malformed, treating as logged out");
    }
    record
}

/// What the navbar's identity area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    /// "Log In" and "Sign Up" buttons.
    #[default]
    LoggedOut,
    /// A name button whose dropdown offers "Logout".
    LoggedIn {
        /// Display name of the visitor.
        name: String,
    },
}

impl Identity {
    fn from_record(record: Option<SessionRecord>) -> Self {
        record.map_or(Self::LoggedOut, |record| Self::LoggedIn { name: record.name })
    }

    /// Display name when logged in.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn { name } => Some(name),
        }
    }

    /// Whether a visitor is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn { .. })
    }
}

/// Identity state of one mounted navbar.
///
/// Dropping the monitor unsubscribes it from the `storage` event.
#[derive(Debug)]
pub struct SessionMonitor {
    session: SessionStore,
    identity: Arc<RwLock<Identity>>,
    _storage_subscription: Subscription,
}

impl SessionMonitor {
    /// Mount a monitor: read the current record and start following the
    /// `storage` event.
    #[must_use]
    pub fn mount(session: SessionStore) -> Self {
        let identity = Arc::new(RwLock::new(Identity::default()));
        refresh(session.context().store().as_ref(), &identity);

        let subscription = {
            let store = Arc::clone(session.context().store());
            let identity = Arc::clone(&identity);
            session
                .context()
                .on_storage(move || refresh(store.as_ref(), &identity))
        };

        Self {
            session,
            identity,
            _storage_subscription: subscription,
        }
    }

    /// Current identity display state.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Log `user` in. Every monitor in the context, this one included,
    /// picks the change up through the `storage` event.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    pub fn login(&self, user: &SessionRecord) -> Result<(), StorageError> {
        self.session.write(user)?;
        tracing::info!(name = %user.name, "Visitor logged in");
        Ok(())
    }

    /// Log the visitor out everywhere in the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.session.clear()?;
        tracing::info!("Visitor logged out");
        Ok(())
    }
}

fn refresh(store: &dyn KeyValueStore, identity: &RwLock<Identity>) {
    let next = Identity::from_record(read_record(store));
    *identity.write().unwrap_or_else(PoisonError::into_inner) = next;
}
