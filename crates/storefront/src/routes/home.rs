//! Page route handler and the page view model.
//!
//! The whole storefront is one page: navbar, product listing, and whatever
//! modals, panels and toasts are currently open.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use mealcart_core::{Price, Product};
use tracing::instrument;

use crate::catalog::LoadState;
use crate::navbar::{Badges, Overlay};
use crate::order::Field;
use crate::page::Storefront;
use crate::state::AppState;
use crate::store::Toast;

use super::PageQuery;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub price: String,
}

impl ProductCard {
    fn new(product: &Product, price: &Price) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.display_name.clone(),
            thumbnail: product.thumbnail_url.clone(),
            price: price.display(),
        }
    }
}

/// Catalog section display data.
#[derive(Debug, Clone)]
pub enum CatalogSection {
    Loading,
    Error(&'static str),
    Products(Vec<ProductCard>),
}

/// One input of the add-to-cart form.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
}

/// The open add-to-cart form.
#[derive(Debug, Clone)]
pub struct CheckoutView {
    pub product: ProductCard,
    pub fields: Vec<FieldView>,
}

/// Toast display data.
#[derive(Debug, Clone)]
pub struct ToastView {
    pub css_class: &'static str,
    pub message: String,
}

impl From<Toast> for ToastView {
    fn from(toast: Toast) -> Self {
        Self {
            css_class: toast.level.css_class(),
            message: toast.message,
        }
    }
}

// =============================================================================
// Template
// =============================================================================

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct PageTemplate {
    pub location: String,
    /// `?city=...` appended to every form action, or empty.
    pub return_query: String,
    pub user_name: Option<String>,
    pub account_menu_open: bool,
    pub badges: Badges,
    pub cart_open: bool,
    pub favorites_open: bool,
    pub login_open: bool,
    pub signup_open: bool,
    pub auth_error: Option<String>,
    pub cart_items: Vec<ProductCard>,
    pub favorite_items: Vec<ProductCard>,
    pub catalog: CatalogSection,
    pub checkout: Option<CheckoutView>,
    pub favorite_confirm: Option<ProductCard>,
    pub toasts: Vec<ToastView>,
}

impl PageTemplate {
    /// Snapshot the storefront for rendering.
    ///
    /// Consumes the product page's unseen toasts, so each toast is rendered
    /// once.
    pub fn build(storefront: &mut Storefront, price: &Price, query: &PageQuery) -> Self {
        let card = |product: &Product| ProductCard::new(product, price);

        let navbar = storefront.navbar();
        let identity = navbar.identity();
        let badges = navbar.badges();
        let account_menu_open = navbar.is_open(Overlay::AccountMenu);
        let cart_open = navbar.is_open(Overlay::CartDrawer);
        let favorites_open = navbar.is_open(Overlay::FavoritesPanel);
        let signup_open = navbar.is_open(Overlay::SignUpModal);
        let login_open = storefront.login_modal_open();

        let store = storefront.store();
        let cart_items = store.cart_items().iter().map(card).collect();
        let favorite_items = store.favorite_items().iter().map(card).collect();

        let page = storefront.product_page();
        let catalog = match page.catalog() {
            LoadState::Idle | LoadState::Loading => CatalogSection::Loading,
            LoadState::Errored(message) => CatalogSection::Error(message),
            LoadState::Ready(products) => {
                CatalogSection::Products(products.iter().map(card).collect())
            }
        };

        let intake = page.intake();
        let checkout = intake.pending_cart().map(|product| CheckoutView {
            product: card(product),
            fields: Field::ALL
                .into_iter()
                .map(|field| FieldView {
                    key: field.key(),
                    label: field.label(),
                    value: intake.form().value(field).to_string(),
                    error: intake.errors().get(field),
                })
                .collect(),
        });
        let favorite_confirm = intake.pending_favorite().map(card);

        let toasts = storefront
            .product_page_mut()
            .take_toasts()
            .into_iter()
            .map(ToastView::from)
            .collect();

        Self {
            location: query.location().to_string(),
            return_query: query.query_string(),
            user_name: identity.name().map(str::to_string),
            account_menu_open,
            badges,
            cart_open,
            favorites_open,
            login_open,
            signup_open,
            auth_error: None,
            cart_items,
            favorite_items,
            catalog,
            checkout,
            favorite_confirm,
            toasts,
        }
    }

    /// Show `message` in the open login or sign-up modal.
    #[must_use]
    pub fn with_auth_error(mut self, message: impl Into<String>) -> Self {
        self.auth_error = Some(message.into());
        self
    }
}

/// Render the page from the current state.
pub(crate) fn render(state: &AppState, query: &PageQuery) -> PageTemplate {
    let price = state.config().display_price;
    let mut storefront = state.storefront();
    PageTemplate::build(&mut storefront, &price, query)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the storefront page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<PageQuery>) -> PageTemplate {
    render(&state, &query)
}
