//! Property-level change information
//!
//! A `PropertySnapshot` is one property of a tracked entity as seen by the
//! session: its name, in-memory current and original values, and whether the
//! session flagged it as modified. Values use `serde_json::Value` so any
//! host type system can be represented; `Value::Null` models a stored NULL.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One property of a tracked entity, with its change information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    /// Property name as declared on the entity
    pub name: String,

    /// In-memory value at capture time
    pub current: Value,

    /// Value the session considers original for this unit-of-work
    pub original: Value,

    /// Whether the session flagged this property as modified
    pub is_modified: bool,
}

impl PropertySnapshot {
    /// Create a snapshot with explicit values and modified flag
    pub fn new(
        name: impl Into<String>,
        original: Value,
        current: Value,
        is_modified: bool,
    ) -> Self {
        Self {
            name: name.into(),
            current,
            original,
            is_modified,
        }
    }

    /// Create an unmodified snapshot where original and current agree
    ///
    /// This is the shape of every property on freshly-created and removed
    /// entries, and of untouched properties on updated ones.
    pub fn unchanged(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            current: value.clone(),
            original: value,
            is_modified: false,
        }
    }

    /// Create a modified snapshot with distinct original and current values
    pub fn modified(name: impl Into<String>, original: Value, current: Value) -> Self {
        Self {
            name: name.into(),
            current,
            original,
            is_modified: true,
        }
    }
}
