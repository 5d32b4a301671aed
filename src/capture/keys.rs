//! Row identifier extraction
//!
//! Builds the stable string identifier recorded on history rows from an
//! entry's declared identity properties. Single keys are the stringified
//! current value; composite keys are comma-joined in declared order.
//! Embedded commas in key values are not escaped; the joined format must
//! stay byte-compatible with existing stored rows.

use std::sync::Arc;

use dashmap::DashMap;

use crate::entry::TrackedEntry;

use super::changeset::encode_key_value;

/// Extracts primary-key strings, caching the declared key-property list
/// per entity type
pub struct KeyExtractor {
    key_properties: DashMap<String, Arc<Vec<String>>>,
}

impl KeyExtractor {
    pub fn new() -> Self {
        Self {
            key_properties: DashMap::new(),
        }
    }

    /// The row identifier for this entry
    ///
    /// Null key values render as empty strings; a keyless entity yields an
    /// empty identifier. For created entries this must run after the store
    /// has assigned generated keys, so the identifier reflects the real key.
    pub fn primary_key<E: TrackedEntry>(&self, entry: &E) -> String {
        let names = self.key_properties_for(entry);
        let parts: Vec<String> = names
            .iter()
            .map(|name| {
                entry
                    .property(name)
                    .map(|p| encode_key_value(&p.current))
                    .unwrap_or_default()
            })
            .collect();
        parts.join(",")
    }

    fn key_properties_for<E: TrackedEntry>(&self, entry: &E) -> Arc<Vec<String>> {
        if let Some(names) = self.key_properties.get(entry.entity_type()) {
            return Arc::clone(names.value());
        }
        let computed = Arc::new(entry.key_properties().to_vec());
        let guard = self
            .key_properties
            .entry(entry.entity_type().to_string())
            .or_insert(computed);
        Arc::clone(guard.value())
    }
}

impl Default for KeyExtractor {
    fn default() -> Self {
        Self::new()
    }
}
