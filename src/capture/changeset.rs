//! Change-sets and their serialized form
//!
//! A `ChangeSet` maps property names to a short list of string-encoded
//! values: one element for created/removed captures, `[before, after]` for
//! updates. `None` elements are explicit nulls and survive the round trip,
//! distinct from a property being absent altogether.
//!
//! The persisted representation is a JSON object with string keys and
//! arrays of string-or-null; it must decode back to an equal `ChangeSet`.
//! Raw values are embedded without additional escaping so the stored format
//! stays byte-compatible with existing history rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChronicleError, ChronicleResult};

/// Per-entity mapping of property name to encoded change values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(BTreeMap<String, Vec<Option<String>>>);

impl ChangeSet {
    /// Create an empty change-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single known value (created/removed captures)
    pub fn record_single(&mut self, property: impl Into<String>, value: Option<String>) {
        self.0.insert(property.into(), vec![value]);
    }

    /// Record a `[before, after]` pair (update captures)
    pub fn record_pair(
        &mut self,
        property: impl Into<String>,
        before: Option<String>,
        after: Option<String>,
    ) {
        self.0.insert(property.into(), vec![before, after]);
    }

    /// Encoded values for a property, if present
    pub fn get(&self, property: &str) -> Option<&[Option<String>]> {
        self.0.get(property).map(Vec::as_slice)
    }

    /// Whether the change-set carries this property
    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    /// Number of properties in the change-set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the change-set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(property, values)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.0.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Serialize into the compact persisted text form
    pub fn encode(&self) -> ChronicleResult<String> {
        serde_json::to_string(&self)
            .map_err(|e| ChronicleError::Codec(format!("Failed to encode change-set: {}", e)))
    }

    /// Parse the persisted text form back into a change-set
    ///
    /// Malformed input is a [`ChronicleError::Codec`] error, never a
    /// silently empty result.
    pub fn decode(text: &str) -> ChronicleResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ChronicleError::Codec(format!("Failed to parse change-set: {}", e)))
    }
}

/// Encode a value for storage in a change-set
///
/// Nulls become `None`; strings are taken as-is; everything else uses its
/// compact JSON rendering.
pub fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Encode a value for use inside a row identifier (null becomes "")
pub fn encode_key_value(value: &Value) -> String {
    encode_value(value).unwrap_or_default()
}
