//! Integration tests for the catalog against a local listing API.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use mealcart_integration_tests::serve_listing;
use mealcart_storefront::catalog::{
    CatalogClient, CatalogError, CatalogView, FETCH_FAILED_MESSAGE, LoadState, NO_PRODUCTS_MESSAGE,
};
use mealcart_storefront::page::Storefront;
use mealcart_storefront::storage::BrowserContext;

const SEAFOOD: &str = r#"{
    "meals": [
        {"strMeal": "Baked salmon with fennel & tomatoes", "strMealThumb": "https://www.themealdb.com/images/media/meals/1548772327.jpg", "idMeal": "52959"},
        {"strMeal": "Cajun spiced fish tacos", "strMealThumb": "https://www.themealdb.com/images/media/meals/uvuyxu1503067369.jpg", "idMeal": "52819"}
    ]
}"#;

#[tokio::test]
async fn test_listing_loads_into_view() {
    let config = serve_listing(StatusCode::OK, SEAFOOD).await.unwrap();
    let client = CatalogClient::new(&config).unwrap();

    let view = CatalogView::new();
    view.mount(client).unwrap().await.unwrap();

    let state = view.state();
    let names: Vec<_> = state
        .products()
        .iter()
        .map(|p| p.display_name.as_str())
        .collect();
    assert_eq!(
        names,
        ["Baked salmon with fennel & tomatoes", "Cajun spiced fish tacos"]
    );
}

#[tokio::test]
async fn test_null_meals_shows_no_products_found() {
    let config = serve_listing(StatusCode::OK, r#"{"meals": null}"#)
        .await
        .unwrap();
    let client = CatalogClient::new(&config).unwrap();

    let storefront = Storefront::new(BrowserContext::in_memory());
    storefront.mount_catalog(client).unwrap().await.unwrap();

    assert_eq!(
        storefront.product_page().catalog(),
        LoadState::Errored(NO_PRODUCTS_MESSAGE)
    );
    assert_eq!(storefront.store().cart_len(), 0);
    assert_eq!(storefront.store().favorites_len(), 0);
}

#[tokio::test]
async fn test_empty_listing_is_ready() {
    let config = serve_listing(StatusCode::OK, r#"{"meals": []}"#)
        .await
        .unwrap();
    let client = CatalogClient::new(&config).unwrap();

    let view = CatalogView::new();
    view.mount(client).unwrap().await.unwrap();
    assert_eq!(view.state(), LoadState::Ready(Vec::new()));
}

#[tokio::test]
async fn test_server_error_shows_fetch_failed() {
    let config = serve_listing(StatusCode::INTERNAL_SERVER_ERROR, "boom")
        .await
        .unwrap();
    let client = CatalogClient::new(&config).unwrap();

    let err = client.products().await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 500 }));

    let view = CatalogView::new();
    view.mount(client).unwrap().await.unwrap();
    assert_eq!(view.state(), LoadState::Errored(FETCH_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_remounted_view_gets_same_listing() {
    let config = serve_listing(StatusCode::OK, SEAFOOD).await.unwrap();
    let client = CatalogClient::new(&config).unwrap();

    let first = CatalogView::new();
    first.mount(client.clone()).unwrap().await.unwrap();
    let second = CatalogView::new();
    second.mount(client).unwrap().await.unwrap();

    assert_eq!(first.state(), second.state());
    assert_eq!(second.state().products().len(), 2);
}
