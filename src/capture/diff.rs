//! The diff builder
//!
//! Turns one tracked entry plus its eligible properties into a change-set,
//! or decides that no record should be emitted at all. This is a state
//! machine over the entry lifecycle:
//!
//! - `Created`: every eligible property contributes its current value as a
//!   single entry. Runs after the store has assigned generated keys.
//! - `Updated`: only modified eligible properties are captured. The before
//!   value is the in-memory original unless it equals the current value, in
//!   which case the last-persisted value is fetched from the store.
//!   Sessions sometimes reset their notion of "original" after the value
//!   already changed in the backing store, and a diff with identical before
//!   and after strings tells an auditor nothing. The in-memory comparison
//!   always runs first; the store fallback second. No modified properties
//!   means no record.
//! - `Removed`: every eligible property contributes its original
//!   (pre-deletion) value as a single entry.
//!
//! Any other state is a caller filtering bug and fails immediately.

use tracing::trace;

use crate::entry::{EntityState, PropertySnapshot, TrackedEntry};
use crate::error::{ChronicleError, ChronicleResult};

use super::changeset::{encode_value, ChangeSet};

/// Build the change-set for an entry, or `None` when no record is due
pub fn build_change_set<E: TrackedEntry>(
    entry: &E,
    eligible: &[&PropertySnapshot],
) -> ChronicleResult<Option<ChangeSet>> {
    match entry.state() {
        EntityState::Created => Ok(Some(created_change_set(eligible))),
        EntityState::Updated => updated_change_set(entry, eligible),
        EntityState::Removed => Ok(Some(removed_change_set(eligible))),
        state => Err(ChronicleError::unsupported_state(state)),
    }
}

fn created_change_set(eligible: &[&PropertySnapshot]) -> ChangeSet {
    let mut change_set = ChangeSet::new();
    for property in eligible {
        change_set.record_single(property.name.as_str(), encode_value(&property.current));
    }
    change_set
}

fn removed_change_set(eligible: &[&PropertySnapshot]) -> ChangeSet {
    let mut change_set = ChangeSet::new();
    for property in eligible {
        change_set.record_single(property.name.as_str(), encode_value(&property.original));
    }
    change_set
}

fn updated_change_set<E: TrackedEntry>(
    entry: &E,
    eligible: &[&PropertySnapshot],
) -> ChronicleResult<Option<ChangeSet>> {
    let modified: Vec<&PropertySnapshot> = eligible
        .iter()
        .copied()
        .filter(|p| p.is_modified)
        .collect();
    if modified.is_empty() {
        trace!(
            entity_type = entry.entity_type(),
            "updated entry has no modified eligible properties"
        );
        return Ok(None);
    }

    // The store round trip is expensive: at most one per entry, and only
    // when some modified property needs the persisted baseline.
    let persisted = if modified.iter().any(|p| p.original == p.current) {
        Some(entry.store_values()?)
    } else {
        None
    };

    let mut change_set = ChangeSet::new();
    for property in modified {
        let before = if property.original != property.current {
            encode_value(&property.original)
        } else {
            persisted
                .as_ref()
                .and_then(|values| values.get(&property.name))
                .and_then(encode_value)
        };
        change_set.record_pair(
            property.name.as_str(),
            before,
            encode_value(&property.current),
        );
    }
    Ok(Some(change_set))
}
