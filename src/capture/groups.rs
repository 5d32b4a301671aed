//! Group-id correlation
//!
//! When enabled, history rows of configured entity types carry the value of
//! a designated property as their group id, so related rows (possibly of
//! different types) can be queried together as one logical change. The id
//! is never synthesized: no switch, no mapping, or a null value all mean no
//! group id.

use std::sync::Arc;

use crate::config::CaptureSettings;
use crate::entry::TrackedEntry;

use super::changeset::encode_value;

/// Resolves the optional group id for an entry
pub struct GroupCorrelator {
    settings: Arc<CaptureSettings>,
}

impl GroupCorrelator {
    pub fn new(settings: Arc<CaptureSettings>) -> Self {
        Self { settings }
    }

    /// The group id for this entry, or `None`
    pub fn group_id<E: TrackedEntry>(&self, entry: &E) -> Option<String> {
        if !self.settings.group_ids_enabled() {
            return None;
        }
        let property = self.settings.group_property_for(entry.entity_type())?;
        let snapshot = entry.property(property)?;
        encode_value(&snapshot.current)
    }
}
