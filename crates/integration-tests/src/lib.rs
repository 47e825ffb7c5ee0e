//! Integration tests for the Repurpose Hub API.
//!
//! These run against a live server backed by a migrated `PostgreSQL`
//! database, so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! rp-cli migrate
//! cargo run -p repurpose-api &
//! cargo test -p repurpose-integration-tests -- --ignored
//! ```
//!
//! `API_BASE_URL` overrides the server address (default `http://localhost:8080`).

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use repurpose_core::Envelope;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// An email address no previous run has registered.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// HTTP client bound to the API base URL.
pub struct TestClient {
    client: Client,
    base_url: String,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// Create a client for [`base_url`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: base_url(),
        }
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn post(&self, path: &str, body: &Value) -> reqwest::Result<Response> {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
    }

    /// GET a path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn get(&self, path: &str) -> reqwest::Result<Response> {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
    }
}

/// Decode an enveloped response body.
///
/// # Errors
///
/// Returns an error if the body is not a valid envelope around `T`.
pub async fn envelope<T: DeserializeOwned>(response: Response) -> reqwest::Result<Envelope<T>> {
    response.json().await
}
