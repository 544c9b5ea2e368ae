//! Integration tests for Mealcart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mealcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_monitor` - Login/logout broadcast across mounted views
//! - `order_intake` - Cart and favorite workflows end to end
//! - `catalog` - Listing fetch against a local canned API
//!
//! Nothing here reaches the network: the catalog tests serve canned JSON
//! from an in-process axum server bound to `127.0.0.1:0`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};
use mealcart_core::{Email, EmailError, SessionRecord};
use mealcart_storefront::config::CatalogConfig;
use mealcart_storefront::order::CheckoutForm;
use url::Url;

/// A session record for `name` / `email`.
///
/// # Errors
///
/// Returns an error if `email` is not a valid address.
pub fn record(name: &str, email: &str) -> Result<SessionRecord, EmailError> {
    Ok(SessionRecord::new(name, Email::parse(email)?))
}

/// A fully filled-in add-to-cart form with the given email.
#[must_use]
pub fn filled_form(email: &str) -> CheckoutForm {
    CheckoutForm {
        name: "Ann".to_string(),
        email: email.to_string(),
        phone: "9876543210".to_string(),
        address: "12 Marine Drive".to_string(),
        city: "Kochi".to_string(),
        province: "Kerala".to_string(),
    }
}

/// Serve `body` with `status` at `/filter.php` on an ephemeral port.
///
/// Returns the catalog configuration pointing at it.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn serve_listing(
    status: StatusCode,
    body: &'static str,
) -> std::io::Result<CatalogConfig> {
    let app = Router::new().route("/filter.php", get(move || async move { (status, body) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let url = Url::parse(&format!("http://{addr}/filter.php?c=Seafood"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    Ok(CatalogConfig {
        url,
        timeout: Duration::from_secs(5),
    })
}
