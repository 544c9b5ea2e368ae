//! Order intake: the add-to-cart form and the add-to-favorites confirmation.
//!
//! Both workflows start from a product card and hold that product as the
//! pending selection while a modal is open. Closing a modal, by confirming
//! or cancelling, always clears its pending selection.
//!
//! # Cart
//!
//! 1. [`OrderIntake::request_add_to_cart`] opens a blank contact form.
//! 2. [`OrderIntake::submit_checkout`] checks that no field is blank. Any
//!    error keeps the form open and mutates nothing.
//! 3. A complete form is authorized against the session record read fresh
//!    from storage. No session, or an email that is not exactly the stored
//!    one, closes the form, queues an error toast and opens the login
//!    modal. A match dispatches [`Action::AddProduct`].
//!
//! # Favorites
//!
//! [`OrderIntake::request_add_to_favorite`] opens a yes/no confirmation;
//! [`OrderIntake::confirm_favorite`] dispatches [`Action::AddFavorite`] and
//! [`OrderIntake::cancel_favorite`] discards the selection.

use std::fmt;

use mealcart_core::Product;
use serde::Deserialize;

use crate::session::SessionStore;
use crate::store::{Action, AppStore};

/// Error toast for an unauthenticated or mismatched checkout.
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please sign up or log in first or enter correct email.";

/// Contact form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    City,
    Province,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::Province,
    ];

    /// Form input name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Province => "province",
        }
    }

    /// Input label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
            Self::Province => "Province",
        }
    }

    /// Message shown when the field is left blank.
    #[must_use]
    pub const fn required_message(self) -> &'static str {
        match self {
            Self::Name => "Name is required",
            Self::Email => "Email is required",
            Self::Phone => "Phone number is required",
            Self::Address => "Address is required",
            Self::City => "City is required",
            Self::Province => "Province is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Add-to-cart contact form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
}

impl CheckoutForm {
    /// Raw value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::Province => &self.province,
        }
    }

    /// Check every field.
    ///
    /// All fields are required; blank after trimming is missing. The email
    /// is not checked further: whatever was typed is compared against the
    /// logged-in visitor as is.
    ///
    /// # Errors
    ///
    /// Returns one message per blank field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        for field in Field::ALL {
            if self.value(field).trim().is_empty() {
                errors.insert(field, field.required_message());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    fn insert(&mut self, field: Field, message: &'static str) {
        self.entries.retain(|(f, _)| *f != field);
        self.entries.push((field, message));
        self.entries.sort_by_key(|(f, _)| *f);
    }

    /// Message for `field`, if it is invalid.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invalid fields with their messages, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

/// Result of submitting the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No form is open; nothing happened.
    NoPendingProduct,
    /// Validation failed; the form stays open with these messages.
    Invalid(FieldErrors),
    /// Not logged in or wrong email; the login modal is now open.
    LoginRequired,
    /// The product was appended to the cart.
    Added(Product),
}

/// Modal and pending-selection state of one mounted product page.
#[derive(Debug)]
pub struct OrderIntake {
    store: AppStore,
    session: SessionStore,
    pending_cart: Option<Product>,
    pending_favorite: Option<Product>,
    form: CheckoutForm,
    errors: FieldErrors,
    login_modal_open: bool,
}

impl OrderIntake {
    /// Create the intake for a page.
    #[must_use]
    pub fn new(store: AppStore, session: SessionStore) -> Self {
        Self {
            store,
            session,
            pending_cart: None,
            pending_favorite: None,
            form: CheckoutForm::default(),
            errors: FieldErrors::default(),
            login_modal_open: false,
        }
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Open the contact form for `product` with blank fields.
    pub fn request_add_to_cart(&mut self, product: Product) {
        tracing::debug!(product_id = %product.id, "Cart form opened");
        self.pending_cart = Some(product);
        self.form = CheckoutForm::default();
        self.errors = FieldErrors::default();
    }

    /// Whether the contact form is open.
    #[must_use]
    pub const fn checkout_open(&self) -> bool {
        self.pending_cart.is_some()
    }

    /// Product waiting for the contact form.
    #[must_use]
    pub const fn pending_cart(&self) -> Option<&Product> {
        self.pending_cart.as_ref()
    }

    /// Values shown in the open form.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Validation messages shown in the open form.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Submit the contact form.
    pub fn submit_checkout(&mut self, form: CheckoutForm) -> SubmitOutcome {
        if self.pending_cart.is_none() {
            return SubmitOutcome::NoPendingProduct;
        }

        if let Err(errors) = form.validate() {
            tracing::debug!(invalid = errors.entries.len(), "Cart form rejected");
            self.form = form;
            self.errors = errors.clone();
            return SubmitOutcome::Invalid(errors);
        }

        let authorized = self
            .session
            .current()
            .is_some_and(|record| record.email.matches(&form.email));

        let Some(product) = self.close_checkout() else {
            return SubmitOutcome::NoPendingProduct;
        };

        if !authorized {
            tracing::info!(product_id = %product.id, "Checkout needs a matching login");
            self.store.toasts().error(LOGIN_REQUIRED_MESSAGE);
            self.login_modal_open = true;
            return SubmitOutcome::LoginRequired;
        }

        tracing::info!(product_id = %product.id, "Product added to cart");
        self.store.dispatch(Action::AddProduct(product.clone()));
        SubmitOutcome::Added(product)
    }

    /// Close the contact form, discarding its data. Returns the product
    /// that was pending.
    pub fn close_checkout(&mut self) -> Option<Product> {
        self.form = CheckoutForm::default();
        self.errors = FieldErrors::default();
        self.pending_cart.take()
    }

    // -------------------------------------------------------------------------
    // Favorites
    // -------------------------------------------------------------------------

    /// Open the favorite confirmation for `product`.
    pub fn request_add_to_favorite(&mut self, product: Product) {
        tracing::debug!(product_id = %product.id, "Favorite confirmation opened");
        self.pending_favorite = Some(product);
    }

    /// Whether the favorite confirmation is open.
    #[must_use]
    pub const fn favorite_open(&self) -> bool {
        self.pending_favorite.is_some()
    }

    /// Product waiting for confirmation.
    #[must_use]
    pub const fn pending_favorite(&self) -> Option<&Product> {
        self.pending_favorite.as_ref()
    }

    /// Confirm: append the pending product to the favorites.
    pub fn confirm_favorite(&mut self) -> Option<Product> {
        let product = self.pending_favorite.take()?;
        tracing::info!(product_id = %product.id, "Product added to favorites");
        self.store.dispatch(Action::AddFavorite(product.clone()));
        Some(product)
    }

    /// Cancel: discard the pending product.
    pub fn cancel_favorite(&mut self) {
        self.pending_favorite = None;
    }

    // -------------------------------------------------------------------------
    // Login modal
    // -------------------------------------------------------------------------

    /// Whether this page's login modal is open.
    #[must_use]
    pub const fn login_modal_open(&self) -> bool {
        self.login_modal_open
    }

    /// Close this page's login modal.
    pub fn close_login_modal(&mut self) {
        self.login_modal_open = false;
    }
}
