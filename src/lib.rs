//! chronicle - change auditing for unit-of-work persistence sessions
//!
//! This library inspects the pending modifications a unit-of-work session is
//! tracking and materializes them into structured history records: one row
//! per created, updated, or removed entity, carrying a compact before/after
//! change-set. The host ORM supplies entries through the [`TrackedEntry`]
//! trait; chronicle decides eligibility, computes diffs (including the
//! persisted-baseline fallback for stale in-memory originals), and hands the
//! finished records back. Attaching them to a session and committing remain
//! the caller's job.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: capture settings, frozen after setup
//! - `error`: custom error types
//! - `entry`: the input boundary (lifecycle states, property snapshots,
//!   the `TrackedEntry` trait and its buildable `RecordedEntry` form)
//! - `capture`: the engine (exclusion rules, key extraction, group
//!   correlation, diff building, the change-set codec, history records)
//!
//! # Example
//!
//! ```rust,ignore
//! use chronicle::{CaptureSettings, HistoryEngine};
//!
//! let engine = HistoryEngine::new(
//!     CaptureSettings::new("billing-api")
//!         .exclude_type("AuditSnapshot")
//!         .enable_group_ids()
//!         .group_by("Order", "order_number"),
//! );
//!
//! let records = engine.capture_pending(&session_entries, Some("kaylee"))?;
//! ```

pub mod capture;
pub mod config;
pub mod entry;
pub mod error;

pub use capture::{ChangeSet, HistoryEngine, HistoryKind, HistoryRecord};
pub use config::CaptureSettings;
pub use entry::{EntityState, PropertySnapshot, RecordedEntry, TrackedEntry};
pub use error::{ChronicleError, ChronicleResult};
