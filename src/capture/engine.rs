//! The capture engine
//!
//! Ties the resolver, extractor, correlator, and diff builder together and
//! exposes the two-pass capture API:
//!
//! 1. [`capture_pending`](HistoryEngine::capture_pending) before the caller
//!    commits: handles updated and removed entries.
//! 2. [`capture_inserted`](HistoryEngine::capture_inserted) after the store
//!    has assigned generated keys: handles created entries, so their row
//!    identifiers reflect the real keys.
//!
//! Records come back to the caller for attachment to a session; attaching
//! and committing stay the caller's explicit follow-up steps. The `*_with`
//! variants map each record through a caller-supplied constructor so
//! extended row types (extra columns, tenant tags) ride through capture
//! unchanged.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::CaptureSettings;
use crate::entry::{EntityState, PropertySnapshot, TrackedEntry};
use crate::error::ChronicleResult;

use super::diff;
use super::exclusion::ExclusionResolver;
use super::groups::GroupCorrelator;
use super::keys::KeyExtractor;
use super::record::{HistoryKind, HistoryRecord};

/// Orchestrates change capture for tracked entries
///
/// One engine per process is the intended shape: it owns the per-type
/// caches, which are safe to share across sessions on different threads.
pub struct HistoryEngine {
    settings: Arc<CaptureSettings>,
    exclusions: ExclusionResolver,
    keys: KeyExtractor,
    groups: GroupCorrelator,
}

impl HistoryEngine {
    /// Build an engine from settings; the settings are frozen from here on
    pub fn new(settings: CaptureSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            exclusions: ExclusionResolver::new(Arc::clone(&settings)),
            keys: KeyExtractor::new(),
            groups: GroupCorrelator::new(Arc::clone(&settings)),
            settings,
        }
    }

    /// The settings this engine was built with
    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// First pass: capture updated and removed entries before the commit
    ///
    /// Unchanged entries are skipped; created entries are left for
    /// [`capture_inserted`](Self::capture_inserted) once their keys exist.
    pub fn capture_pending<E: TrackedEntry>(
        &self,
        entries: &[E],
        actor: Option<&str>,
    ) -> ChronicleResult<Vec<HistoryRecord>> {
        self.capture_pending_with(entries, actor, |record| record)
    }

    /// [`capture_pending`](Self::capture_pending), mapping each record
    /// through a caller-supplied row constructor
    pub fn capture_pending_with<E, R, F>(
        &self,
        entries: &[E],
        actor: Option<&str>,
        mut make_row: F,
    ) -> ChronicleResult<Vec<R>>
    where
        E: TrackedEntry,
        F: FnMut(HistoryRecord) -> R,
    {
        let mut rows = Vec::new();
        for entry in entries {
            match entry.state() {
                EntityState::Updated | EntityState::Removed => {}
                _ => continue,
            }
            if let Some(record) = self.capture_entry(entry, actor)? {
                rows.push(make_row(record));
            }
        }
        Ok(rows)
    }

    /// Second pass: capture created entries after generated keys exist
    pub fn capture_inserted<E: TrackedEntry>(
        &self,
        entries: &[E],
        actor: Option<&str>,
    ) -> ChronicleResult<Vec<HistoryRecord>> {
        self.capture_inserted_with(entries, actor, |record| record)
    }

    /// [`capture_inserted`](Self::capture_inserted), mapping each record
    /// through a caller-supplied row constructor
    pub fn capture_inserted_with<E, R, F>(
        &self,
        entries: &[E],
        actor: Option<&str>,
        mut make_row: F,
    ) -> ChronicleResult<Vec<R>>
    where
        E: TrackedEntry,
        F: FnMut(HistoryRecord) -> R,
    {
        let mut rows = Vec::new();
        for entry in entries {
            if entry.state() != EntityState::Created {
                continue;
            }
            if let Some(record) = self.capture_entry(entry, actor)? {
                rows.push(make_row(record));
            }
        }
        Ok(rows)
    }

    /// Capture a single entry with no state filtering
    ///
    /// `Ok(None)` means the entry produces no record (excluded type, or an
    /// update with nothing eligible modified). Passing an `Unchanged` entry
    /// is a caller bug and fails with
    /// [`UnsupportedState`](crate::error::ChronicleError::UnsupportedState).
    pub fn capture_entry<E: TrackedEntry>(
        &self,
        entry: &E,
        actor: Option<&str>,
    ) -> ChronicleResult<Option<HistoryRecord>> {
        if self.exclusions.is_excluded(entry) {
            trace!(
                entity_type = entry.entity_type(),
                "type excluded from history capture"
            );
            return Ok(None);
        }

        let eligible: Vec<&PropertySnapshot> = self.exclusions.eligible(entry);

        let change_set = match diff::build_change_set(entry, &eligible)? {
            Some(change_set) => change_set,
            None => return Ok(None),
        };

        let record = HistoryRecord {
            id: None,
            row_id: self.keys.primary_key(entry),
            table_name: entry.table_name().to_string(),
            changed: change_set.encode()?,
            kind: HistoryKind::try_from(entry.state())?,
            actor: actor.map(str::to_string),
            application: self.settings.application().to_string(),
            created_at: self.settings.now(),
            group_id: self.groups.group_id(entry),
        };
        debug!(
            entity_type = entry.entity_type(),
            row_id = %record.row_id,
            kind = %record.kind,
            "captured history record"
        );
        Ok(Some(record))
    }
}
