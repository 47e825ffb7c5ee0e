//! Product repository.

use repurpose_core::ProductId;

use crate::models::{NewProduct, Product};
use crate::store::{Collection, Filter, RecordGateway, StoreError};

use super::{from_document, to_document};

/// Repository for product records.
pub struct ProductRepository<'a> {
    gateway: &'a RecordGateway,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(gateway: &'a RecordGateway) -> Self {
        Self { gateway }
    }

    /// Insert a product; the store assigns its id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    pub async fn create(&self, product: NewProduct) -> Result<Product, StoreError> {
        let document = to_document(&product)?;
        let id = self.gateway.insert(Collection::Products, document).await?;
        Ok(product.with_id(ProductId::new(id)))
    }

    /// List every product in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    /// Returns `StoreError::DataCorruption` if a stored document is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.gateway
            .find_all(Collection::Products, &Filter::all())
            .await?
            .into_iter()
            .map(from_document::<Product>)
            .collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        match self
            .gateway
            .find_one(Collection::Products, &Filter::by_id(id.as_uuid()))
            .await
        {
            Ok(document) => from_document(document).map(Some),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
