//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the store)
//!
//! # Users
//! POST /createUser             - Register
//! POST /getUser                - Password login
//! GET  /users/{id}             - User profile by id
//!
//! # Products
//! POST /createProduct          - Create a product
//! GET  /allProducts            - List all products
//! GET  /product/{id}           - Product by id
//! ```
//!
//! Every JSON response is wrapped in an [`Envelope`], including unknown
//! paths (404) and known paths hit with the wrong method (405).

pub mod health;
pub mod products;
pub mod users;

use axum::{
    Json, Router,
    http::{Method, StatusCode, Uri},
    routing::{get, post},
};
use serde::Serialize;

use repurpose_core::Envelope;

use crate::error::AppError;
use crate::state::AppState;

/// Successful handler output: status code plus enveloped JSON body.
pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

/// Wrap a payload in the response envelope.
pub(crate) fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> ApiResponse<T> {
    (status, Json(Envelope::new(status.as_u16(), message, data)))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/createUser", post(users::create))
        .route("/getUser", post(users::login))
        .route("/users/{id}", get(users::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/createProduct", post(products::create))
        .route("/allProducts", get(products::index))
        .route("/product/{id}", get(products::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(user_routes())
        .merge(product_routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}
