//! Typed repositories over the record store.
//!
//! # Collections
//!
//! - `users` - registered users ([`users::UserRepository`])
//! - `products` - the product catalogue ([`products::ProductRepository`])
//!
//! Repositories convert between domain models and stored documents. Every
//! call goes through [`RecordGateway`](crate::store::RecordGateway), so it is
//! bounded by the store timeout.

pub mod products;
pub mod users;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::store::{Document, StoreError};

/// Serialize a model into a store document.
fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(StoreError::DataCorruption(e.to_string())),
    }
}

/// Deserialize a store document into a model.
fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StoreError::DataCorruption(format!("invalid stored document: {e}")))
}
