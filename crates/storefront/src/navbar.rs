//! Navigation bar state.
//!
//! The navbar combines the [`SessionMonitor`] (who is logged in) with the
//! badge counts read from the [`AppStore`], and owns the open/closed flags
//! of everything it can pop up: the account dropdown, the cart drawer, the
//! favorites panel, and the login and sign-up modals.

use mealcart_core::SessionRecord;

use crate::session::{Identity, SessionMonitor, SessionStore};
use crate::storage::StorageError;
use crate::store::AppStore;

/// Badge counts. Always equal to the current collection lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Badges {
    pub favorites: usize,
    pub cart: usize,
}

/// Overlays the navbar can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    AccountMenu,
    CartDrawer,
    FavoritesPanel,
    LoginModal,
    SignUpModal,
}

#[derive(Debug, Default)]
struct OverlayFlags {
    account_menu: bool,
    cart_drawer: bool,
    favorites_panel: bool,
    login_modal: bool,
    signup_modal: bool,
}

impl OverlayFlags {
    const fn slot(&mut self, overlay: Overlay) -> &mut bool {
        match overlay {
            Overlay::AccountMenu => &mut self.account_menu,
            Overlay::CartDrawer => &mut self.cart_drawer,
            Overlay::FavoritesPanel => &mut self.favorites_panel,
            Overlay::LoginModal => &mut self.login_modal,
            Overlay::SignUpModal => &mut self.signup_modal,
        }
    }

    const fn get(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::AccountMenu => self.account_menu,
            Overlay::CartDrawer => self.cart_drawer,
            Overlay::FavoritesPanel => self.favorites_panel,
            Overlay::LoginModal => self.login_modal,
            Overlay::SignUpModal => self.signup_modal,
        }
    }
}

/// One mounted navigation bar.
#[derive(Debug)]
pub struct Navbar {
    monitor: SessionMonitor,
    store: AppStore,
    overlays: OverlayFlags,
}

impl Navbar {
    /// Mount a navbar: read the session and start following the `storage`
    /// event. Badges are read from the shared store on every access.
    #[must_use]
    pub fn mount(session: SessionStore, store: AppStore) -> Self {
        Self {
            monitor: SessionMonitor::mount(session),
            store,
            overlays: OverlayFlags::default(),
        }
    }

    /// Identity area state.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.monitor.identity()
    }

    /// Current badge counts.
    #[must_use]
    pub fn badges(&self) -> Badges {
        Badges {
            favorites: self.store.favorites_len(),
            cart: self.store.cart_len(),
        }
    }

    /// Whether `overlay` is open.
    #[must_use]
    pub const fn is_open(&self, overlay: Overlay) -> bool {
        self.overlays.get(overlay)
    }

    /// Open `overlay`. The account dropdown only opens while logged in.
    pub fn open(&mut self, overlay: Overlay) {
        if overlay == Overlay::AccountMenu && !self.identity().is_logged_in() {
            return;
        }
        *self.overlays.slot(overlay) = true;
    }

    /// Close `overlay`.
    pub const fn close(&mut self, overlay: Overlay) {
        *self.overlays.slot(overlay) = false;
    }

    /// Flip the account dropdown.
    pub fn toggle_account_menu(&mut self) {
        if self.is_open(Overlay::AccountMenu) {
            self.close(Overlay::AccountMenu);
        } else {
            self.open(Overlay::AccountMenu);
        }
    }

    /// Login or sign-up modal success callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be stored; the modals
    /// stay open in that case.
    pub fn login(&mut self, user: &SessionRecord) -> Result<(), StorageError> {
        self.monitor.login(user)?;
        self.close(Overlay::LoginModal);
        self.close(Overlay::SignUpModal);
        Ok(())
    }

    /// "Logout" from the account dropdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be removed.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.monitor.logout()?;
        self.close(Overlay::AccountMenu);
        Ok(())
    }
}
