//! Audit history of a document

use serde::{Deserialize, Serialize};

use super::aggregate::DocumentId;
use super::metadata::{DocumentMetadata, MetadataFieldName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    MetadataUpdated,
    Processed,
    Unprocessed,
    Trashed,
    Restored,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetadataUpdated => "metadata_updated",
            Self::Processed => "processed",
            Self::Unprocessed => "unprocessed",
            Self::Trashed => "trashed",
            Self::Restored => "restored",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "metadata_updated" => Some(Self::MetadataUpdated),
            "processed" => Some(Self::Processed),
            "unprocessed" => Some(Self::Unprocessed),
            "trashed" => Some(Self::Trashed),
            "restored" => Some(Self::Restored),
            _ => None,
        }
    }

    /// UI label
    pub fn label(&self) -> &'static str {
        match self {
            Self::MetadataUpdated => "Metadata updated",
            Self::Processed => "Marked processed",
            Self::Unprocessed => "Marked unprocessed",
            Self::Trashed => "Moved to trash",
            Self::Restored => "Restored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHistoryEntry {
    pub id: i64,
    pub document_id: DocumentId,
    pub action: HistoryAction,
    pub field: Option<MetadataFieldName>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One changed field between two metadata versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: MetadataFieldName,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Display-level differences, in field declaration order
pub fn diff_metadata(before: &DocumentMetadata, after: &DocumentMetadata) -> Vec<FieldChange> {
    MetadataFieldName::ALL
        .into_iter()
        .filter_map(|field| {
            let old_value = before.display_value(field);
            let new_value = after.display_value(field);
            let id_changed = before.identifier(DocumentMetadata::id_path(field))
                != after.identifier(DocumentMetadata::id_path(field));
            (old_value != new_value || id_changed).then(|| FieldChange {
                field,
                old_value: old_value.map(str::to_string),
                new_value: new_value.map(str::to_string),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_reports_changed_fields_only() {
        let before = DocumentMetadata {
            policy_number: Some("PLCY-1".into()),
            policy_id: Some(1),
            loss_sequence: Some("1 - Fire".into()),
            loss_id: Some(2),
            ..Default::default()
        };
        let after = DocumentMetadata {
            policy_number: Some("PLCY-2".into()),
            policy_id: Some(3),
            document_description: Some("Invoice".into()),
            ..Default::default()
        };
        let changes = diff_metadata(&before, &after);
        let fields: Vec<_> = changes.iter().map(|c| c.field).collect();
        assert_eq!(
            fields,
            vec![
                MetadataFieldName::PolicyNumber,
                MetadataFieldName::LossSequence,
                MetadataFieldName::DocumentDescription,
            ]
        );
        assert_eq!(changes[1].new_value, None);
        assert!(diff_metadata(&after, &after).is_empty());
    }

    #[test]
    fn test_action_round_trip_names() {
        for action in [
            HistoryAction::MetadataUpdated,
            HistoryAction::Processed,
            HistoryAction::Unprocessed,
            HistoryAction::Trashed,
            HistoryAction::Restored,
        ] {
            assert_eq!(HistoryAction::parse(action.as_str()), Some(action));
        }
    }
}
