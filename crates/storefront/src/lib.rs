//! Mealcart Storefront library.
//!
//! The presentation core of the storefront (session monitor, state
//! container, catalog view, order intake and navbar) plus the axum surface
//! that serves it. Exposed as a library so it can be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod navbar;
pub mod observe;
pub mod order;
pub mod page;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;

use axum::{
    Router,
    http::{HeaderValue, header},
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the storefront router with its middleware stack.
///
/// Responses are never cached: the page mirrors live visitor state.
pub fn app(state: AppState) -> Router {
    routes::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mealcart_core::{CurrencyCode, Email, Price, Product, SessionRecord};
    use tower::ServiceExt;

    use super::*;
    use crate::catalog::{CatalogError, CatalogSource, LoadState};
    use crate::config::{CatalogConfig, StorefrontConfig};
    use crate::storage::BrowserContext;

    #[derive(Clone)]
    struct Listing(Vec<Product>);

    impl CatalogSource for Listing {
        fn fetch_products(
            &self,
        ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send {
            let products = self.0.clone();
            async move { Ok(products) }
        }
    }

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            catalog: CatalogConfig::default(),
            storage_path: None,
            display_price: Price::parse("450", CurrencyCode::INR).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    async fn loaded_state() -> AppState {
        let state = AppState::with_context(
            config(),
            BrowserContext::in_memory(),
            Listing(vec![Product::new(
                "52819",
                "Cajun spiced fish tacos",
                "https://example.com/tacos.jpg",
            )]),
        );
        while matches!(
            state.storefront().product_page().catalog(),
            LoadState::Loading
        ) {
            tokio::task::yield_now().await;
        }
        state
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(loaded_state().await);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_page_renders_listing_and_location() {
        let app = app(loaded_state().await);
        let response = app
            .oneshot(Request::get("/?city=Kochi").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        let html = body_text(response).await;
        assert!(html.contains("Cajun spiced fish tacos"));
        assert!(html.contains("Location:Kochi"));
        assert!(html.contains("₹450"));
        assert!(html.contains("Log In"));
    }

    #[tokio::test]
    async fn test_events_redirect_back() {
        let app = app(loaded_state().await);
        let response = app.oneshot(post("/products/52819/cart")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_city_survives_events() {
        let state = loaded_state().await;
        let response = app(state.clone())
            .oneshot(post("/nav/panels/cart/open?city=Kochi"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/?city=Kochi"
        );

        let html = body_text(
            app(state)
                .oneshot(Request::get("/?city=Kochi").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"action="/nav/panels/cart/close?city=Kochi""#));
        assert!(html.contains(r#"action="/products/52819/cart?city=Kochi""#));
    }

    #[tokio::test]
    async fn test_invalid_submit_keeps_city() {
        let state = loaded_state().await;
        app(state.clone())
            .oneshot(post("/products/52819/cart?city=Kochi"))
            .await
            .unwrap();

        let response = app(state)
            .oneshot(post_form("/cart/submit?city=Kochi", "name=Ann&email="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Location:Kochi"));
        assert!(html.contains(r#"action="/cart/submit?city=Kochi""#));
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let app = app(loaded_state().await);
        let response = app.oneshot(post("/products/0/favorite")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_submit_rerenders_form() {
        let state = loaded_state().await;
        app(state.clone())
            .oneshot(post("/products/52819/cart"))
            .await
            .unwrap();

        let response = app(state.clone())
            .oneshot(post_form("/cart/submit", "name=Ann&email="))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Email is required"));
        assert!(html.contains("Province is required"));
        assert_eq!(state.storefront().store().cart_len(), 0);
    }

    #[tokio::test]
    async fn test_matching_submit_adds_to_cart() {
        let state = loaded_state().await;
        state
            .storefront()
            .complete_login(&SessionRecord::new(
                "Ann",
                Email::parse("a@x.com").unwrap(),
            ))
            .unwrap();

        app(state.clone())
            .oneshot(post("/products/52819/cart"))
            .await
            .unwrap();
        let response = app(state.clone())
            .oneshot(post_form(
                "/cart/submit",
                "name=Ann&email=a%40x.com&phone=1&address=2&city=3&province=4",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.storefront().store().cart_len(), 1);

        let html = body_text(
            app(state)
                .oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Product added to cart successfully!"));
    }

    #[tokio::test]
    async fn test_login_form_logs_in() {
        let state = loaded_state().await;
        let response = app(state.clone())
            .oneshot(post_form("/auth/login", "name=Ann&email=a%40x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            state.storefront().navbar().identity().name(),
            Some("Ann")
        );

        let response = app(state.clone())
            .oneshot(post_form("/auth/signup", "name=&email=a%40x.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
