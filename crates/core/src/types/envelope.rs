//! Uniform JSON response envelope.
//!
//! Every API response body, success or failure, has the shape
//! `{"status": <int>, "message": <string>, "data": <object>}`. On failure
//! `data` is an [`ErrorBody`] with a single `error` field.

use serde::{Deserialize, Serialize};

/// The response wrapper returned by every endpoint.
///
/// `status` always mirrors the HTTP status code of the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Create a new envelope.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }
}

/// Payload carried in `data` for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl Envelope<ErrorBody> {
    /// Create a failure envelope.
    #[must_use]
    pub fn error(status: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            status,
            message,
            ErrorBody {
                error: error.into(),
            },
        )
    }
}
