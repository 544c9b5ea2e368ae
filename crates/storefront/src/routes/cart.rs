//! Cart route handlers.
//!
//! "Add to cart" opens the contact form; submitting it appends the product
//! once the form is valid and the email matches the logged-in visitor.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use mealcart_core::MealId;
use tracing::instrument;

use crate::error::Result;
use crate::order::{CheckoutForm, SubmitOutcome};
use crate::page::UiEvent;
use crate::state::AppState;

use super::{PageQuery, apply, back_to_page, home};

/// Open the add-to-cart form for a product.
///
/// POST /products/{id}/cart
#[instrument(skip(state))]
pub async fn request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::AddToCart(MealId::from(id)), &query)
}

/// Submit the add-to-cart form.
///
/// POST /cart/submit
///
/// Re-renders the page with the form open when a field is invalid.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let outcome = state.storefront().submit_checkout(form);
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            tracing::debug!(invalid = errors.iter().count(), "Re-rendering cart form");
            (StatusCode::UNPROCESSABLE_ENTITY, home::render(&state, &query)).into_response()
        }
        SubmitOutcome::NoPendingProduct
        | SubmitOutcome::LoginRequired
        | SubmitOutcome::Added(_) => back_to_page(&query).into_response(),
    }
}

/// Close the add-to-cart form.
///
/// POST /cart/cancel
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::CloseCheckout, &query)
}
