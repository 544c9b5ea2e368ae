//! Catalog identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a meal in the remote catalog.
///
/// The catalog sends ids as decimal strings (`"52819"`); they are kept as
/// opaque text and only ever compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(String);

impl MealId {
    /// Create a new ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MealId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for MealId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
