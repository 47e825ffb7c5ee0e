//! User repository.

use repurpose_core::UserId;

use crate::models::User;
use crate::store::{Collection, Filter, RecordGateway, StoreError};

use super::{from_document, to_document};

/// Repository for user records.
pub struct UserRepository<'a> {
    gateway: &'a RecordGateway,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(gateway: &'a RecordGateway) -> Self {
        Self { gateway }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find(&Filter::all().eq("email", email)).await
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    /// Returns `StoreError::DataCorruption` if the stored document is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.find(&Filter::by_id(id.as_uuid())).await
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the id or email already exists.
    /// Returns `StoreError::Unavailable`/`StoreError::Timeout` if the store fails.
    pub async fn create(&self, user: &User) -> Result<UserId, StoreError> {
        let document = to_document(user)?;
        let id = self.gateway.insert(Collection::Users, document).await?;
        Ok(UserId::new(id))
    }

    async fn find(&self, filter: &Filter) -> Result<Option<User>, StoreError> {
        match self.gateway.find_one(Collection::Users, filter).await {
            Ok(document) => from_document(document).map(Some),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
