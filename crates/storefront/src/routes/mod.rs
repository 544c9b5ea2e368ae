//! HTTP route handlers for storefront.
//!
//! Every POST is one UI event against the visitor's storefront and answers
//! with a redirect back to the page (post/redirect/get). A form submit with
//! validation errors re-renders the page instead, with the form still open.
//!
//! The page's `?city=` query rides along on every form action, so the
//! location label survives each round trip.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Page (?city= sets the location label)
//! GET  /health                    - Health check
//!
//! # Navbar
//! POST /nav/menu/toggle           - Account dropdown
//! POST /nav/panels/cart/open      - Cart drawer
//! POST /nav/panels/cart/close
//! POST /nav/panels/favorites/open - Favorites panel
//! POST /nav/panels/favorites/close
//!
//! # Auth
//! POST /auth/login/open           - Login modal
//! POST /auth/login/close
//! POST /auth/signup/open          - Sign-up modal
//! POST /auth/signup/close
//! POST /auth/login                - Login success {name, email}
//! POST /auth/signup               - Sign-up success {name, email}
//! POST /auth/logout               - Logout
//!
//! # Products
//! POST /products/{id}/cart        - Open the add-to-cart form
//! POST /products/{id}/favorite    - Open the add-to-favorite confirmation
//!
//! # Cart
//! POST /cart/submit               - Submit the add-to-cart form
//! POST /cart/cancel               - Close the form
//!
//! # Favorites
//! POST /favorites/confirm         - Confirm the pending favorite
//! POST /favorites/cancel          - Discard the pending favorite
//! ```

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod home;
pub mod nav;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use url::form_urlencoded;

use crate::error::Result;
use crate::page::UiEvent;
use crate::state::AppState;

/// Page query parameters, carried on every route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub city: Option<String>,
}

impl PageQuery {
    /// Text of the location label.
    #[must_use]
    pub fn location(&self) -> &str {
        self.city.as_deref().unwrap_or_default()
    }

    /// Query string to append to page links, `""` when there is no city.
    #[must_use]
    pub fn query_string(&self) -> String {
        match self.city.as_deref() {
            Some(city) if !city.is_empty() => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .append_pair("city", city)
                    .finish();
                format!("?{encoded}")
            }
            _ => String::new(),
        }
    }
}

/// Redirect back to the page after handling an event.
pub(crate) fn back_to_page(query: &PageQuery) -> Redirect {
    Redirect::to(&format!("/{}", query.query_string()))
}

/// Handle `event` and redirect back to the page.
pub(crate) fn apply(state: &AppState, event: UiEvent, query: &PageQuery) -> Result<Redirect> {
    state.storefront().handle(event)?;
    Ok(back_to_page(query))
}

/// Create the navbar routes router.
pub fn nav_routes() -> Router<AppState> {
    Router::new()
        .route("/menu/toggle", post(nav::toggle_account_menu))
        .route("/panels/cart/open", post(nav::open_cart))
        .route("/panels/cart/close", post(nav::close_cart))
        .route("/panels/favorites/open", post(nav::open_favorites))
        .route("/panels/favorites/close", post(nav::close_favorites))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/login/open", post(auth::open_login))
        .route("/login/close", post(auth::close_login))
        .route("/signup", post(auth::signup))
        .route("/signup/open", post(auth::open_signup))
        .route("/signup/close", post(auth::close_signup))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/cart", post(cart::request))
        .route("/{id}/favorite", post(favorites::request))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/submit", post(cart::submit))
        .route("/cancel", post(cart::cancel))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/confirm", post(favorites::confirm))
        .route("/cancel", post(favorites::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Page
        .route("/", get(home::home))
        .route("/health", get(health))
        // Navbar
        .nest("/nav", nav_routes())
        // Auth modals
        .nest("/auth", auth_routes())
        // Product cards
        .nest("/products", product_routes())
        // Modals
        .nest("/cart", cart_routes())
        .nest("/favorites", favorite_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
