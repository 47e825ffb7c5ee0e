//! User role.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Free-text user role.
///
/// Roles are not enforced anywhere; the value is stored and echoed back.
/// New users get [`Role::DEFAULT`] unless the registration payload names one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Role assigned when none is given.
    pub const DEFAULT: &'static str = "user";

    /// Create a role from any string.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Returns the role as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
