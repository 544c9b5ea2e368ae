//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::page::UiError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading or writing the visitor's key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<UiError> for AppError {
    fn from(err: UiError) -> Self {
        match err {
            UiError::UnknownProduct(id) => Self::NotFound(format!("product {id}")),
            UiError::Storage(err) => Self::Storage(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        match &self {
            Self::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a login.
pub fn set_sentry_user(name: &str, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(name.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mealcart_core::MealId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 52819".to_string());
        assert_eq!(err.to_string(), "Not found: product 52819");

        let err = AppError::Storage(StorageError::Io(std::io::Error::other("disk full")));
        assert_eq!(err.to_string(), "Storage error: storage I/O error: disk full");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Storage(StorageError::Io(std::io::Error::other(
                "test"
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let err = AppError::from(UiError::Storage(StorageError::Io(std::io::Error::other(
            "/var/lib/mealcart/store.json",
        ))));
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Internal server error");
    }

    #[test]
    fn test_unknown_product_maps_to_not_found() {
        let err = AppError::from(UiError::UnknownProduct(MealId::new("7")));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
