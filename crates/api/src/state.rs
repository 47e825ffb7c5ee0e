//! Application state shared across handlers.

use std::sync::Arc;

use crate::store::RecordGateway;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Handlers reach the record
/// store only through it; there are no process-wide store handles.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gateway: RecordGateway,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(gateway: RecordGateway) -> Self {
        Self {
            inner: Arc::new(AppStateInner { gateway }),
        }
    }

    /// Get a reference to the record store gateway.
    #[must_use]
    pub fn gateway(&self) -> &RecordGateway {
        &self.inner.gateway
    }
}
