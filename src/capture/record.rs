//! History records
//!
//! The output unit of the capture engine: one row describing one entity's
//! lifecycle transition, carrying the serialized change-set. Records are
//! handed back to the caller for attachment to a session; the crate never
//! persists them itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::EntityState;
use crate::error::{ChronicleError, ChronicleResult};

use super::changeset::ChangeSet;

/// Lifecycle transition a history record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Created,
    Updated,
    Removed,
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryKind::Created => write!(f, "created"),
            HistoryKind::Updated => write!(f, "updated"),
            HistoryKind::Removed => write!(f, "removed"),
        }
    }
}

impl TryFrom<EntityState> for HistoryKind {
    type Error = ChronicleError;

    fn try_from(state: EntityState) -> Result<Self, Self::Error> {
        match state {
            EntityState::Created => Ok(HistoryKind::Created),
            EntityState::Updated => Ok(HistoryKind::Updated),
            EntityState::Removed => Ok(HistoryKind::Removed),
            state => Err(ChronicleError::unsupported_state(state)),
        }
    }
}

/// One captured history row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Numeric identity assigned by the persistence layer; `None` until then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Row identifier of the audited entity (possibly composite)
    pub row_id: String,

    /// Table or collection name of the audited entity
    pub table_name: String,

    /// Serialized change-set (see [`ChangeSet`])
    pub changed: String,

    /// Lifecycle transition
    pub kind: HistoryKind,

    /// Who made the change, when supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Application the change originated from
    pub application: String,

    /// When the record was captured (UTC)
    pub created_at: DateTime<Utc>,

    /// Correlation id shared by related rows, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl HistoryRecord {
    /// Decode the stored change-set
    pub fn change_set(&self) -> ChronicleResult<ChangeSet> {
        ChangeSet::decode(&self.changed)
    }
}

impl std::fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {} {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.kind,
            self.table_name,
            self.row_id
        )?;
        if let Some(actor) = &self.actor {
            write!(f, " by {}", actor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record() -> HistoryRecord {
        HistoryRecord {
            id: None,
            row_id: "42".to_string(),
            table_name: "blogs".to_string(),
            changed: "{\"title\":[\"Old\",\"New\"]}".to_string(),
            kind: HistoryKind::Updated,
            actor: Some("kaylee".to_string()),
            application: "billing-api".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap(),
            group_id: None,
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(HistoryKind::Created.to_string(), "created");
        assert_eq!(HistoryKind::Updated.to_string(), "updated");
        assert_eq!(HistoryKind::Removed.to_string(), "removed");
    }

    #[test]
    fn test_kind_from_state() {
        assert_eq!(
            HistoryKind::try_from(EntityState::Created).unwrap(),
            HistoryKind::Created
        );
        assert_eq!(
            HistoryKind::try_from(EntityState::Removed).unwrap(),
            HistoryKind::Removed
        );
        assert!(HistoryKind::try_from(EntityState::Unchanged)
            .unwrap_err()
            .is_unsupported_state());
    }

    #[test]
    fn test_change_set_accessor() {
        let record = sample_record();
        let cs = record.change_set().unwrap();
        assert_eq!(
            cs.get("title").unwrap(),
            [Some("Old".to_string()), Some("New".to_string())]
        );
    }

    #[test]
    fn test_change_set_accessor_rejects_corrupt_text() {
        let mut record = sample_record();
        record.changed = "not json".to_string();
        assert!(record.change_set().unwrap_err().is_codec());
    }

    #[test]
    fn test_serialization_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        // Absent optional fields are omitted entirely
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("group_id"));

        let decoded: HistoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.row_id, "42");
        assert_eq!(decoded.kind, HistoryKind::Updated);
        assert_eq!(decoded.created_at, record.created_at);
    }

    #[test]
    fn test_display() {
        let text = sample_record().to_string();
        assert!(text.contains("updated"));
        assert!(text.contains("blogs"));
        assert!(text.contains("42"));
        assert!(text.contains("by kaylee"));
    }
}
