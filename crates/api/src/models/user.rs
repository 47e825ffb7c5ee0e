//! User domain types.

use std::fmt;

use serde::{Deserialize, Serialize};

use repurpose_core::{Role, UserId};

/// A registered user, as stored.
///
/// Never serialize this into a response: it carries the password hash.
/// Use [`UserProfile`] instead.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID, assigned at registration.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address (unique across users).
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Free-text role.
    #[serde(default)]
    pub role: Role,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}
