//! The host-ORM boundary trait
//!
//! A `TrackedEntry` is one entity instance mid-transaction as exposed by the
//! host unit-of-work session. The crate consumes entries read-only; adapters
//! for a concrete ORM implement this trait (or materialize into
//! [`RecordedEntry`](super::RecordedEntry)).

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ChronicleResult;

use super::property::PropertySnapshot;
use super::state::EntityState;

/// One tracked entity instance supplied by the host session
pub trait TrackedEntry {
    /// Entity type name; identifies the type for exclusion and key caching
    fn entity_type(&self) -> &str;

    /// Table or collection name recorded on history rows
    fn table_name(&self) -> &str;

    /// Lifecycle state within the current unit-of-work
    fn state(&self) -> EntityState;

    /// Ordered property snapshots for this instance
    fn properties(&self) -> &[PropertySnapshot];

    /// Names of the declared identity properties, in key order
    ///
    /// Empty for keyless entities, which yield an empty row identifier.
    fn key_properties(&self) -> &[String];

    /// Fetch the last-persisted values for this instance from the store
    ///
    /// This is a synchronous round trip to the backing store and is
    /// expensive; the diff builder invokes it at most once per entry, and
    /// only when a modified property's in-memory original equals its current
    /// value. Properties absent from the returned map are treated as null.
    fn store_values(&self) -> ChronicleResult<HashMap<String, Value>>;

    /// Look up a property snapshot by name
    fn property(&self, name: &str) -> Option<&PropertySnapshot> {
        self.properties().iter().find(|p| p.name == name)
    }
}
