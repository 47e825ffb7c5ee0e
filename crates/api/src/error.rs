//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every failure leaves as a JSON envelope with the
//! error description under `data.error`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use repurpose_core::{Envelope, IdError};

use crate::services::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Route exists but not for this method.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

fn store_status(err: &StoreError) -> (StatusCode, &'static str) {
    if err.is_unavailable() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable");
    }
    match err {
        StoreError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
        StoreError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}

impl AppError {
    /// HTTP status and short message for this error.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Store(err) | Self::Auth(AuthError::Store(err)) => store_status(err),
            Self::Auth(AuthError::UserAlreadyExists) => (StatusCode::CONFLICT, "User already exists"),
            Self::Auth(AuthError::InvalidCredentials) => (StatusCode::UNAUTHORIZED, "Login failed"),
            Self::Auth(AuthError::PasswordHash) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            Self::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        }
    }

    /// Client-facing error description.
    ///
    /// Server-side details stay in the logs.
    fn detail(&self, status: StatusCode) -> String {
        if status.is_server_error() {
            return if status == StatusCode::SERVICE_UNAVAILABLE {
                "the record store is unavailable, try again later".to_string()
            } else {
                "internal server error".to_string()
            };
        }
        match self {
            Self::Auth(AuthError::UserAlreadyExists) => {
                "an account with this email already exists".to_string()
            }
            Self::Auth(AuthError::InvalidCredentials) => "invalid email or password".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::MethodNotAllowed(msg) => {
                msg.clone()
            }
            Self::Store(StoreError::Conflict(_))
            | Self::Auth(AuthError::Store(StoreError::Conflict(_))) => {
                "a conflicting record already exists".to_string()
            }
            Self::Store(StoreError::NotFound)
            | Self::Auth(AuthError::Store(StoreError::NotFound)) => "record not found".to_string(),
            // Remaining variants are all 5xx and handled above.
            _ => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Envelope::error(status.as_u16(), message, self.detail(status));
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use repurpose_core::ErrorBody;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn get_body(err: AppError) -> Envelope<ErrorBody> {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Timeout(Duration::from_secs(10)))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::Store(StoreError::Unavailable(
                "down".to_string()
            )))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::MethodNotAllowed("DELETE /allProducts".to_string())),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Conflict("products_pkey".to_string()))),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_envelope_mirrors_status() {
        let body = get_body(AppError::BadRequest("malformed id".to_string())).await;
        assert_eq!(body.status, 400);
        assert_eq!(body.message, "Bad request");
        assert_eq!(body.data.error, "malformed id");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let body = get_body(AppError::Store(StoreError::DataCorruption(
            "users row 7 has no email".to_string(),
        )))
        .await;
        assert_eq!(body.status, 500);
        assert!(!body.data.error.contains("row 7"));

        let body = get_body(AppError::Store(StoreError::Unavailable(
            "connection refused (os error 111)".to_string(),
        )))
        .await;
        assert_eq!(body.status, 503);
        assert!(!body.data.error.contains("os error"));
    }

    #[tokio::test]
    async fn test_store_client_errors_use_fixed_text() {
        let body = get_body(AppError::Store(StoreError::Conflict(
            "products: products_pkey".to_string(),
        )))
        .await;
        assert_eq!(body.status, 409);
        assert_eq!(body.data.error, "a conflicting record already exists");

        let body = get_body(AppError::Store(StoreError::NotFound)).await;
        assert_eq!(body.status, 404);
        assert_eq!(body.data.error, "record not found");
    }
}
