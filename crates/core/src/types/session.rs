//! Session record stored for the logged-in visitor.

use serde::{Deserialize, Serialize};

use crate::types::Email;

/// The logged-in visitor.
///
/// Serialized as JSON (`{"name": ..., "email": ...}`) under the `user` key
/// of the client-side key-value store. Absence of the key means logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Name shown in the navbar.
    pub name: String,
    /// Address the checkout form must match.
    pub email: Email,
}

impl SessionRecord {
    /// Create a new session record.
    #[must_use]
    pub fn new(name: impl Into<String>, email: Email) -> Self {
        Self {
            name: name.into(),
            email,
        }
    }

    /// Decode a stored record.
    ///
    /// Malformed input decodes to `None`: a corrupted entry is
    /// indistinguishable from a logged-out visitor.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Encode the record for storage.
    #[must_use]
    pub fn encode(&self) -> String {
        // Two string fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
