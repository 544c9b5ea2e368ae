//! The storefront as one visitor sees it.
//!
//! A [`Storefront`] is a browser context with its views mounted: the
//! [`Navbar`] and the [`ProductPage`]. Both share the visitor's
//! [`SessionStore`] and [`AppStore`]; neither talks to the other directly.

use mealcart_core::{MealId, Product, SessionRecord};
use tokio::task::JoinHandle;

use crate::catalog::{CatalogSource, CatalogView, LoadState};
use crate::navbar::{Navbar, Overlay};
use crate::order::{CheckoutForm, OrderIntake, SubmitOutcome};
use crate::session::SessionStore;
use crate::storage::{BrowserContext, StorageError};
use crate::store::{AppStore, Toast, ToastReader};

/// Product listing page: catalog, order intake and its toast reader.
#[derive(Debug)]
pub struct ProductPage {
    catalog: CatalogView,
    intake: OrderIntake,
    toasts: ToastReader,
}

impl ProductPage {
    /// Create the page; the catalog is fetched by [`ProductPage::mount`].
    #[must_use]
    pub fn new(store: AppStore, session: SessionStore) -> Self {
        Self {
            catalog: CatalogView::new(),
            toasts: store.toasts().reader(),
            intake: OrderIntake::new(store, session),
        }
    }

    /// Start the one catalog fetch of this page.
    pub fn mount<S: CatalogSource>(&self, source: S) -> Option<JoinHandle<()>> {
        self.catalog.mount(source)
    }

    /// Listing state.
    #[must_use]
    pub fn catalog(&self) -> LoadState {
        self.catalog.state()
    }

    /// Modal state.
    #[must_use]
    pub const fn intake(&self) -> &OrderIntake {
        &self.intake
    }

    /// Toasts not yet shown by this page.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.take()
    }
}

/// Every UI event the storefront reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Open(Overlay),
    Close(Overlay),
    ToggleAccountMenu,
    Logout,
    AddToCart(MealId),
    CloseCheckout,
    AddToFavorite(MealId),
    ConfirmFavorite,
    CancelFavorite,
}

/// Errors from handling a [`UiEvent`].
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// The product is not in the loaded listing.
    #[error("unknown product {0}")]
    UnknownProduct(MealId),

    /// The session record could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One visitor's mounted storefront.
#[derive(Debug)]
pub struct Storefront {
    session: SessionStore,
    store: AppStore,
    navbar: Navbar,
    product_page: ProductPage,
}

impl Storefront {
    /// Mount the navbar and product page over `context`.
    #[must_use]
    pub fn new(context: BrowserContext) -> Self {
        let session = SessionStore::new(context);
        let store = AppStore::new();
        Self {
            navbar: Navbar::mount(session.clone(), store.clone()),
            product_page: ProductPage::new(store.clone(), session.clone()),
            session,
            store,
        }
    }

    /// Start the product page's catalog fetch.
    pub fn mount_catalog<S: CatalogSource>(&self, source: S) -> Option<JoinHandle<()>> {
        self.product_page.mount(source)
    }

    /// The visitor's session.
    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The shared state container.
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// The navbar.
    #[must_use]
    pub const fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    /// The product page.
    #[must_use]
    pub const fn product_page(&self) -> &ProductPage {
        &self.product_page
    }

    /// The product page, for reading its toasts.
    pub const fn product_page_mut(&mut self) -> &mut ProductPage {
        &mut self.product_page
    }

    /// Whether any login modal is open.
    #[must_use]
    pub const fn login_modal_open(&self) -> bool {
        self.navbar.is_open(Overlay::LoginModal) || self.product_page.intake.login_modal_open()
    }

    /// Login or sign-up modal success callback.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    pub fn complete_login(&mut self, user: &SessionRecord) -> Result<(), StorageError> {
        self.navbar.login(user)?;
        self.product_page.intake.close_login_modal();
        Ok(())
    }

    /// Submit the add-to-cart form.
    pub fn submit_checkout(&mut self, form: CheckoutForm) -> SubmitOutcome {
        self.product_page.intake.submit_checkout(form)
    }

    /// Handle a UI event.
    ///
    /// # Errors
    ///
    /// Returns an error for a product id missing from the listing or a
    /// failed logout.
    pub fn handle(&mut self, event: UiEvent) -> Result<(), UiError> {
        tracing::debug!(event = ?event, "UI event");
        match event {
            UiEvent::Open(overlay) => self.navbar.open(overlay),
            UiEvent::Close(Overlay::LoginModal) => {
                self.navbar.close(Overlay::LoginModal);
                self.product_page.intake.close_login_modal();
            }
            UiEvent::Close(overlay) => self.navbar.close(overlay),
            UiEvent::ToggleAccountMenu => self.navbar.toggle_account_menu(),
            UiEvent::Logout => self.navbar.logout()?,
            UiEvent::AddToCart(id) => {
                let product = self.product(&id)?;
                self.product_page.intake.request_add_to_cart(product);
            }
            UiEvent::CloseCheckout => {
                self.product_page.intake.close_checkout();
            }
            UiEvent::AddToFavorite(id) => {
                let product = self.product(&id)?;
                self.product_page.intake.request_add_to_favorite(product);
            }
            UiEvent::ConfirmFavorite => {
                self.product_page.intake.confirm_favorite();
            }
            UiEvent::CancelFavorite => self.product_page.intake.cancel_favorite(),
        }
        Ok(())
    }

    fn product(&self, id: &MealId) -> Result<Product, UiError> {
        self.product_page
            .catalog
            .product(id)
            .ok_or_else(|| UiError::UnknownProduct(id.clone()))
    }
}
