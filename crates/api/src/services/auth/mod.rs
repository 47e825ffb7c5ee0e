//! Authentication service.
//!
//! Provides password registration and login over the `users` collection.

mod error;
mod password;

pub use error::AuthError;
use password::{hash_password, verify_password_or_dummy};

use repurpose_core::{Role, UserId};

use crate::db::users::UserRepository;
use crate::models::User;
use crate::store::{RecordGateway, StoreError};

/// A registration request after structural parsing.
///
/// Carries the plaintext password, so it has no `Debug` impl.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Authentication service.
///
/// Handles user registration and password login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(gateway: &'a RecordGateway) -> Self {
        Self {
            users: UserRepository::new(gateway),
        }
    }

    /// Register a new user with email and password.
    ///
    /// The email check runs before the insert, and the store's unique
    /// constraint catches registrations that race past it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Store` if the store fails.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        if self
            .users
            .get_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_blocking(registration.password).await?;

        let user = User {
            id: UserId::generate(),
            name: registration.name,
            email: registration.email,
            password_hash,
            role: registration.role.map(Role::new).unwrap_or_default(),
        };

        self.users.create(&user).await.map_err(|e| match e {
            StoreError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong.
    /// Returns `AuthError::Store` if the store fails.
    pub async fn login(&self, email: &str, password: String) -> Result<User, AuthError> {
        let user = self.users.get_by_email(email).await?;

        // Unknown emails still pay for one Argon2 verification.
        let hash = user.as_ref().map(|u| u.password_hash.clone());
        if !verify_blocking(password, hash).await {
            return Err(AuthError::InvalidCredentials);
        }

        user.ok_or(AuthError::InvalidCredentials)
    }
}

/// Hash on the blocking pool so the runtime keeps serving other requests.
async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| AuthError::PasswordHash)?
}

async fn verify_blocking(password: String, hash: Option<String>) -> bool {
    tokio::task::spawn_blocking(move || verify_password_or_dummy(&password, hash.as_deref()))
        .await
        .unwrap_or(false)
}
