//! The input boundary: tracked entries supplied by the host session
//!
//! This module contains the types that describe one entity instance
//! mid-transaction: its lifecycle state, its property-level change
//! information, and the trait the capture engine consumes them through.

pub mod property;
pub mod recorded;
pub mod state;
pub mod tracked;

pub use property::PropertySnapshot;
pub use recorded::RecordedEntry;
pub use state::EntityState;
pub use tracked::TrackedEntry;
