//! Custom error types for chronicle
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::entry::EntityState;

/// The main error type for chronicle operations
#[derive(Error, Debug)]
pub enum ChronicleError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Change-set encoding/decoding errors
    #[error("Codec error: {0}")]
    Codec(String),

    /// An entry reached the diff builder in a lifecycle state it cannot
    /// capture (a caller filtering bug, not a data condition)
    #[error("History capture does not support {state} entries")]
    UnsupportedState { state: EntityState },

    /// The lazy fetch of last-persisted values failed
    #[error("Store fetch error: {0}")]
    StoreFetch(String),
}

impl ChronicleError {
    /// Create an "unsupported state" error for a lifecycle state
    pub fn unsupported_state(state: EntityState) -> Self {
        Self::UnsupportedState { state }
    }

    /// Create a store-fetch error from any displayable cause
    pub fn store_fetch(cause: impl std::fmt::Display) -> Self {
        Self::StoreFetch(cause.to_string())
    }

    /// Check if this is a codec (parse) error
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Check if this is an unsupported-state error
    pub fn is_unsupported_state(&self) -> bool {
        matches!(self, Self::UnsupportedState { .. })
    }
}

impl From<serde_json::Error> for ChronicleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result type alias for chronicle operations
pub type ChronicleResult<T> = Result<T, ChronicleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChronicleError::Config("missing application name".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: missing application name"
        );
    }

    #[test]
    fn test_unsupported_state_error() {
        let err = ChronicleError::unsupported_state(EntityState::Unchanged);
        assert_eq!(
            err.to_string(),
            "History capture does not support unchanged entries"
        );
        assert!(err.is_unsupported_state());
        assert!(!err.is_codec());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChronicleError = json_err.into();
        assert!(err.is_codec());
    }

    #[test]
    fn test_store_fetch_error() {
        let err = ChronicleError::store_fetch("connection refused");
        assert_eq!(err.to_string(), "Store fetch error: connection refused");
    }
}
