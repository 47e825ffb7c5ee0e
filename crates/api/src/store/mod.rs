//! Record store gateway.
//!
//! The API keeps its records in a document-oriented store with two logical
//! collections, `users` and `products`. Handlers never talk to a backend
//! directly: they go through [`RecordGateway`], which wraps a
//! [`DocumentStore`] trait object and bounds every operation with a timeout.
//!
//! # Backends
//!
//! - [`PostgresStore`] - one JSONB table per collection (production)
//! - [`MemoryStore`] - in-process maps (tests, local development)
//!
//! # Documents and filters
//!
//! A [`Document`] is a JSON object. The reserved `_id` field carries the
//! record id: callers may set it on insert, otherwise the store assigns one,
//! and it is always present on documents read back. A [`Filter`] is a set of
//! field equality constraints plus an optional id; the empty filter matches
//! every record.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A stored record: a JSON object.
pub type Document = Map<String, Value>;

/// Document field holding the record id.
pub const ID_FIELD: &str = "_id";

/// Default per-operation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the gateway timeout.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// A write collided with an existing record (duplicate id or unique field).
    #[error("write conflict: {0}")]
    Conflict(String),

    /// No record matched the filter.
    #[error("not found")]
    NotFound,

    /// A stored document could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl StoreError {
    /// Whether the error means the store itself is unusable right now.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// The logical collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Products,
}

impl Collection {
    /// Collection name, also used as the backing table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
        }
    }

    /// Fields that must be unique across the collection.
    #[must_use]
    pub const fn unique_fields(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["email"],
            Self::Products => &[],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality filter over documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    id: Option<Uuid>,
    fields: Document,
}

impl Filter {
    /// Filter matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching the record with the given id.
    #[must_use]
    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            fields: Document::new(),
        }
    }

    /// Add an equality constraint on a document field.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_owned(), value.into());
        self
    }

    /// Id constraint, if any.
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Field constraints (never contains `_id`).
    #[must_use]
    pub const fn fields(&self) -> &Document {
        &self.fields
    }

    /// Whether a stored record satisfies this filter.
    #[must_use]
    pub fn matches(&self, id: Uuid, document: &Document) -> bool {
        if self.id.is_some_and(|wanted| wanted != id) {
            return false;
        }
        self.fields
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }
}

/// Backend interface for the record store.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its id.
    ///
    /// Uses the document's `_id` when present, otherwise assigns a new one.
    async fn insert(&self, collection: Collection, document: Document)
    -> Result<Uuid, StoreError>;

    /// Return the first document matching `filter`, or `StoreError::NotFound`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Document, StoreError>;

    /// Return every document matching `filter`, in insertion order.
    async fn find_all(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Timeout-bounded access to a [`DocumentStore`].
///
/// Cheap to clone. No retries: a failed or timed-out operation is reported
/// to the single caller that issued it.
#[derive(Clone)]
pub struct RecordGateway {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl RecordGateway {
    /// Create a gateway over `store` with the given per-operation timeout.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Insert a document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` on a duplicate id or unique field,
    /// `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    pub async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<Uuid, StoreError> {
        self.bounded(collection, "insert", self.store.insert(collection, document))
            .await
    }

    /// Find one document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing matches,
    /// `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    pub async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Document, StoreError> {
        self.bounded(collection, "find_one", self.store.find_one(collection, filter))
            .await
    }

    /// Find all matching documents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    pub async fn find_all(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        self.bounded(collection, "find_all", self.store.find_all(collection, filter))
            .await
    }

    /// Probe the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or slower than the timeout.
    pub async fn ping(&self) -> Result<(), StoreError> {
        tokio::time::timeout(self.timeout, self.store.ping())
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    async fn bounded<T>(
        &self,
        collection: Collection,
        operation: &'static str,
        fut: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        if let Ok(result) = tokio::time::timeout(self.timeout, fut).await {
            result
        } else {
            tracing::warn!(
                %collection,
                operation,
                timeout = ?self.timeout,
                "Store operation timed out"
            );
            Err(StoreError::Timeout(self.timeout))
        }
    }
}

/// Remove and parse the `_id` field of a document about to be inserted.
pub(crate) fn take_id(document: &mut Document) -> Result<Option<Uuid>, StoreError> {
    match document.remove(ID_FIELD) {
        None => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(|_| StoreError::DataCorruption(format!("invalid {ID_FIELD}: {s:?}"))),
        Some(other) => Err(StoreError::DataCorruption(format!(
            "invalid {ID_FIELD}: {other}"
        ))),
    }
}

/// Attach the record id to a document read back from a backend.
pub(crate) fn with_id(id: Uuid, mut document: Document) -> Document {
    document.insert(
        ID_FIELD.to_owned(),
        Value::String(id.hyphenated().to_string()),
    );
    document
}
