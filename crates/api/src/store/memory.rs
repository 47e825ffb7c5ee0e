//! In-process document store.
//!
//! Keeps each collection as an insertion-ordered list behind a `RwLock`.
//! Enforces the same uniqueness rules as the `PostgreSQL` schema (record id,
//! plus [`Collection::unique_fields`]), so handlers behave identically on
//! either backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, StoreError, take_id, with_id};

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<(Uuid, Document)>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<Uuid, StoreError> {
        let id = take_id(&mut document)?.unwrap_or_else(Uuid::new_v4);

        let mut collections = self.collections.write().await;
        let records = collections.entry(collection).or_default();

        if records.iter().any(|(existing, _)| *existing == id) {
            return Err(StoreError::Conflict(format!("duplicate {collection} id {id}")));
        }
        for field in collection.unique_fields() {
            if let Some(value) = document.get(*field)
                && records.iter().any(|(_, doc)| doc.get(*field) == Some(value))
            {
                return Err(StoreError::Conflict(format!(
                    "duplicate {collection}.{field}"
                )));
            }
        }

        records.push((id, document));
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Document, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .and_then(|records| {
                records
                    .iter()
                    .find(|(id, doc)| filter.matches(*id, doc))
                    .map(|(id, doc)| with_id(*id, doc.clone()))
            })
            .ok_or(StoreError::NotFound)
    }

    async fn find_all(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|(id, doc)| filter.matches(*id, doc))
                    .map(|(id, doc)| with_id(*id, doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
