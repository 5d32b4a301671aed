//! The change-capture engine
//!
//! Materializes tracked entity mutations into history records, with
//! before/after change-sets, before or after they are committed.
//!
//! # Architecture
//!
//! The capture pipeline consists of these components:
//!
//! - `ExclusionResolver`: decides which types and properties participate,
//!   merging static markers with runtime configuration, memoized per type.
//! - `KeyExtractor`: builds the row identifier from the declared identity
//!   properties (single or composite).
//! - `GroupCorrelator`: resolves the optional group id correlating related
//!   rows.
//! - `build_change_set`: the diff builder, the per-property before/after
//!   computation over the entry lifecycle.
//! - `ChangeSet`: the diff itself, with its lossless text codec.
//! - `HistoryRecord`: the output row, assembled by `HistoryEngine`.
//! - `HistoryEngine`: the public entry point tying it all together.
//!
//! # Example
//!
//! ```rust,ignore
//! use chronicle::{CaptureSettings, HistoryEngine};
//!
//! let engine = HistoryEngine::new(
//!     CaptureSettings::new("billing-api")
//!         .exclude_property("Order", "row_version"),
//! );
//!
//! // Before committing: updated and removed entries
//! let records = engine.capture_pending(&entries, Some("kaylee"))?;
//! // ... attach records, save, then with post-save entries:
//! let records = engine.capture_inserted(&inserted_entries, Some("kaylee"))?;
//! ```

mod changeset;
mod diff;
mod engine;
mod exclusion;
mod groups;
mod keys;
mod record;

pub use changeset::{encode_key_value, encode_value, ChangeSet};
pub use diff::build_change_set;
pub use engine::HistoryEngine;
pub use exclusion::{ExclusionResolver, ExclusionRule};
pub use groups::GroupCorrelator;
pub use keys::KeyExtractor;
pub use record::{HistoryKind, HistoryRecord};
