//! Favorite route handlers.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use mealcart_core::MealId;
use tracing::instrument;

use crate::error::Result;
use crate::page::UiEvent;
use crate::state::AppState;

use super::{PageQuery, apply};

/// Open the add-to-favorite confirmation for a product.
///
/// POST /products/{id}/favorite
#[instrument(skip(state))]
pub async fn request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::AddToFavorite(MealId::from(id)), &query)
}

/// POST /favorites/confirm
#[instrument(skip(state))]
pub async fn confirm(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::ConfirmFavorite, &query)
}

/// POST /favorites/cancel
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::CancelFavorite, &query)
}
