//! Navbar route handlers: account dropdown, cart drawer, favorites panel.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use tracing::instrument;

use crate::error::Result;
use crate::navbar::Overlay;
use crate::page::UiEvent;
use crate::state::AppState;

use super::{PageQuery, apply};

/// Toggle the account dropdown.
///
/// POST /nav/menu/toggle
#[instrument(skip(state))]
pub async fn toggle_account_menu(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::ToggleAccountMenu, &query)
}

/// POST /nav/panels/cart/open
#[instrument(skip(state))]
pub async fn open_cart(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Open(Overlay::CartDrawer), &query)
}

/// POST /nav/panels/cart/close
#[instrument(skip(state))]
pub async fn close_cart(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Close(Overlay::CartDrawer), &query)
}

/// POST /nav/panels/favorites/open
#[instrument(skip(state))]
pub async fn open_favorites(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Open(Overlay::FavoritesPanel), &query)
}

/// POST /nav/panels/favorites/close
#[instrument(skip(state))]
pub async fn close_favorites(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Close(Overlay::FavoritesPanel), &query)
}
