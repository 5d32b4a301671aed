//! A concrete, buildable tracked entry
//!
//! `RecordedEntry` is the materialized form of a session entry. ORM adapters
//! copy their change-tracker state into it; the test suite uses it as its
//! fixture type. The store fetch is injected as a closure so the
//! persisted-baseline path works against any backing store (or none).

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ChronicleResult;

use super::property::PropertySnapshot;
use super::state::EntityState;
use super::tracked::TrackedEntry;

type StoreFetch = Box<dyn Fn() -> ChronicleResult<HashMap<String, Value>> + Send + Sync>;

/// A self-contained [`TrackedEntry`] built up through chained constructors
pub struct RecordedEntry {
    entity_type: String,
    table_name: String,
    state: EntityState,
    properties: Vec<PropertySnapshot>,
    key_properties: Vec<String>,
    store_fetch: Option<StoreFetch>,
}

impl RecordedEntry {
    /// Create an entry for an entity type in the given lifecycle state
    ///
    /// The table name defaults to the entity type name until overridden
    /// with [`with_table`](Self::with_table).
    pub fn new(entity_type: impl Into<String>, state: EntityState) -> Self {
        let entity_type = entity_type.into();
        Self {
            table_name: entity_type.clone(),
            entity_type,
            state,
            properties: Vec::new(),
            key_properties: Vec::new(),
            store_fetch: None,
        }
    }

    /// Override the table/collection name recorded on history rows
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Append a declared identity property (call once per key part, in order)
    pub fn with_key(mut self, property: impl Into<String>) -> Self {
        self.key_properties.push(property.into());
        self
    }

    /// Append a property snapshot
    pub fn with_property(mut self, property: PropertySnapshot) -> Self {
        self.properties.push(property);
        self
    }

    /// Append an unmodified property where original and current agree
    pub fn with_unchanged(self, name: impl Into<String>, value: Value) -> Self {
        self.with_property(PropertySnapshot::unchanged(name, value))
    }

    /// Append a modified property with distinct original and current values
    pub fn with_modified(
        self,
        name: impl Into<String>,
        original: Value,
        current: Value,
    ) -> Self {
        self.with_property(PropertySnapshot::modified(name, original, current))
    }

    /// Supply the store fetch as a closure
    pub fn with_store_fetch(
        mut self,
        fetch: impl Fn() -> ChronicleResult<HashMap<String, Value>> + Send + Sync + 'static,
    ) -> Self {
        self.store_fetch = Some(Box::new(fetch));
        self
    }

    /// Supply fixed persisted values for the store fetch
    pub fn with_store_values(self, values: HashMap<String, Value>) -> Self {
        self.with_store_fetch(move || Ok(values.clone()))
    }
}

impl TrackedEntry for RecordedEntry {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn state(&self) -> EntityState {
        self.state
    }

    fn properties(&self) -> &[PropertySnapshot] {
        &self.properties
    }

    fn key_properties(&self) -> &[String] {
        &self.key_properties
    }

    fn store_values(&self) -> ChronicleResult<HashMap<String, Value>> {
        match &self.store_fetch {
            Some(fetch) => fetch(),
            None => Ok(HashMap::new()),
        }
    }
}
