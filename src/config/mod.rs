//! Configuration for the capture subsystem
//!
//! Everything the engine needs to know ahead of time lives in
//! [`CaptureSettings`]: exclusion tables, group mapping, marker predicates,
//! application name, and the timestamp source.

pub mod settings;

pub use settings::{CaptureSettings, Clock, PropertyMarker, TypeMarker};
