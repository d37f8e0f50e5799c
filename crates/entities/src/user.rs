//! User-related entity definitions.

use serde::{Deserialize, Serialize};

/// A staff member who can be responsible for devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (email-like), used as the storage key. Immutable
    /// once a record has been stored under it.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl User {
    /// Creates a new user.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
