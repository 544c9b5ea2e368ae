//! Authentication route handlers.
//!
//! The login and sign-up modals only collect `{name, email}`; a valid
//! submission is the modal's success callback and logs the visitor in.

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use mealcart_core::{Email, SessionRecord};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::navbar::Overlay;
use crate::page::UiEvent;
use crate::state::AppState;

use super::{PageQuery, apply, back_to_page, home};

// =============================================================================
// Form Types
// =============================================================================

/// Login and sign-up form data.
#[derive(Debug, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl AuthForm {
    /// Build the session record, or the first problem with the form.
    fn into_record(self) -> std::result::Result<SessionRecord, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required");
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required");
        }
        let email = Email::parse(email).map_err(|_| "Invalid email address")?;
        Ok(SessionRecord::new(name, email))
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn complete(state: &AppState, query: &PageQuery, form: AuthForm) -> Result<Response> {
    let record = match form.into_record() {
        Ok(record) => record,
        Err(message) => {
            tracing::debug!(reason = message, "Auth form rejected");
            let page = home::render(state, query).with_auth_error(message);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    state.storefront().complete_login(&record)?;
    set_sentry_user(&record.name, record.email.as_str());
    Ok(back_to_page(query).into_response())
}

/// Login modal success.
///
/// POST /auth/login
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<AuthForm>,
) -> Result<Response> {
    complete(&state, &query, form)
}

/// Sign-up modal success.
///
/// POST /auth/signup
#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<AuthForm>,
) -> Result<Response> {
    complete(&state, &query, form)
}

/// Log out from the account dropdown.
///
/// POST /auth/logout
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    let redirect = apply(&state, UiEvent::Logout, &query)?;
    clear_sentry_user();
    Ok(redirect)
}

/// POST /auth/login/open
#[instrument(skip(state))]
pub async fn open_login(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Open(Overlay::LoginModal), &query)
}

/// POST /auth/login/close
#[instrument(skip(state))]
pub async fn close_login(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Close(Overlay::LoginModal), &query)
}

/// Open the sign-up modal, also reached from the "SIGN UP NOW" banner.
///
/// POST /auth/signup/open
#[instrument(skip(state))]
pub async fn open_signup(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Open(Overlay::SignUpModal), &query)
}

/// POST /auth/signup/close
#[instrument(skip(state))]
pub async fn close_signup(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Redirect> {
    apply(&state, UiEvent::Close(Overlay::SignUpModal), &query)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> AuthForm {
        AuthForm {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_valid_form_trims() {
        let record = form(" Ann ", " a@x.com ").into_record().unwrap();
        assert_eq!(record.name, "Ann");
        assert_eq!(record.email.as_str(), "a@x.com");
    }

    #[test]
    fn test_invalid_forms() {
        assert_eq!(form("", "a@x.com").into_record(), Err("Name is required"));
        assert_eq!(form("Ann", "  ").into_record(), Err("Email is required"));
        assert_eq!(
            form("Ann", "not-an-email").into_record(),
            Err("Invalid email address")
        );
    }
}
