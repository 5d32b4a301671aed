//! Entity lifecycle states
//!
//! The lifecycle state of a tracked entry as reported by the host
//! unit-of-work session.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked entity within a unit-of-work
///
/// Only `Created`, `Updated`, and `Removed` entries can produce history
/// records; `Unchanged` entries must be filtered out before reaching the
/// diff builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    /// Tracked but not modified in this unit-of-work
    Unchanged,
    /// Newly added; captured in a second pass after generated keys exist
    Created,
    /// Modified; captured before the caller commits
    Updated,
    /// Marked for deletion; captured before the caller commits
    Removed,
}

impl EntityState {
    /// Whether this state can ever produce a history record
    pub fn is_capturable(&self) -> bool {
        !matches!(self, EntityState::Unchanged)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityState::Unchanged => write!(f, "unchanged"),
            EntityState::Created => write!(f, "created"),
            EntityState::Updated => write!(f, "updated"),
            EntityState::Removed => write!(f, "removed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(EntityState::Unchanged.to_string(), "unchanged");
        assert_eq!(EntityState::Created.to_string(), "created");
        assert_eq!(EntityState::Updated.to_string(), "updated");
        assert_eq!(EntityState::Removed.to_string(), "removed");
    }

    #[test]
    fn test_is_capturable() {
        assert!(!EntityState::Unchanged.is_capturable());
        assert!(EntityState::Created.is_capturable());
        assert!(EntityState::Updated.is_capturable());
        assert!(EntityState::Removed.is_capturable());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&EntityState::Removed).unwrap();
        assert_eq!(json, "\"removed\"");
        let state: EntityState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, EntityState::Removed);
    }
}
