//! Document metadata value object and field identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Field identifiers
// ============================================================================

/// Editable metadata field of a document (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetadataFieldName {
    PolicyNumber,
    LossSequence,
    Claimant,
    DocumentDescription,
    AssignedTo,
    ProducerNumber,
}

impl MetadataFieldName {
    pub const ALL: [MetadataFieldName; 6] = [
        Self::PolicyNumber,
        Self::LossSequence,
        Self::Claimant,
        Self::DocumentDescription,
        Self::AssignedTo,
        Self::ProducerNumber,
    ];

    /// Wire name, used in URLs and error maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PolicyNumber => "POLICY_NUMBER",
            Self::LossSequence => "LOSS_SEQUENCE",
            Self::Claimant => "CLAIMANT",
            Self::DocumentDescription => "DOCUMENT_DESCRIPTION",
            Self::AssignedTo => "ASSIGNED_TO",
            Self::ProducerNumber => "PRODUCER_NUMBER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for MetadataFieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot of [`DocumentMetadata`] holding a parent field's identifier.
///
/// Dependency edges point at one of these instead of a string path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataValuePath {
    PolicyId,
    LossId,
    ClaimantId,
    ProducerId,
    AssignedToId,
    DocumentDescription,
}

// ============================================================================
// Assignment
// ============================================================================

/// Kind of assignee; a document is assigned to a user or to a group, never both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeType {
    User,
    Group,
}

impl AssigneeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

impl fmt::Display for AssigneeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Values
// ============================================================================

/// Borrowed view of a field value as seen by the validators.
///
/// `Id(0)` and `Flag(false)` are real values: only `None` and empty text count
/// as missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Id(i64),
    Flag(bool),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(id: i64) -> Self {
        FieldValue::Id(id)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(flag: bool) -> Self {
        FieldValue::Flag(flag)
    }
}

/// New value for a field coming from the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Empty the field (display value and identifier)
    Clear,
    /// Free text (document description)
    Text(String),
    /// Lookup selection carrying the record identifier and its display label
    Selection { id: i64, label: String },
    /// Assignee selection
    Assignee {
        id: i64,
        label: String,
        kind: AssigneeType,
    },
}

/// Current metadata selections of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub policy_number: Option<String>,
    pub policy_id: Option<i64>,
    pub loss_sequence: Option<String>,
    pub loss_id: Option<i64>,
    pub claimant: Option<String>,
    pub claimant_id: Option<i64>,
    pub producer_number: Option<String>,
    pub producer_id: Option<i64>,
    pub document_description: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_to_id: Option<i64>,
    pub assigned_to_type: Option<AssigneeType>,
}

impl DocumentMetadata {
    /// Display value of a field, as validated
    pub fn display_value(&self, field: MetadataFieldName) -> Option<&str> {
        let value = match field {
            MetadataFieldName::PolicyNumber => &self.policy_number,
            MetadataFieldName::LossSequence => &self.loss_sequence,
            MetadataFieldName::Claimant => &self.claimant,
            MetadataFieldName::DocumentDescription => &self.document_description,
            MetadataFieldName::AssignedTo => &self.assigned_to,
            MetadataFieldName::ProducerNumber => &self.producer_number,
        };
        value.as_deref()
    }

    /// Identifier stored at a value path
    pub fn identifier(&self, path: MetadataValuePath) -> Option<i64> {
        match path {
            MetadataValuePath::PolicyId => self.policy_id,
            MetadataValuePath::LossId => self.loss_id,
            MetadataValuePath::ClaimantId => self.claimant_id,
            MetadataValuePath::ProducerId => self.producer_id,
            MetadataValuePath::AssignedToId => self.assigned_to_id,
            // free text has no identifier; presence of text counts as a value
            MetadataValuePath::DocumentDescription => None,
        }
    }

    /// Whether the slot at `path` currently holds a value
    pub fn has_value_at(&self, path: MetadataValuePath) -> bool {
        match path {
            MetadataValuePath::DocumentDescription => self
                .document_description
                .as_deref()
                .is_some_and(|s| !s.is_empty()),
            other => self.identifier(other).is_some(),
        }
    }

    /// Identifier slot belonging to a field
    pub fn id_path(field: MetadataFieldName) -> MetadataValuePath {
        match field {
            MetadataFieldName::PolicyNumber => MetadataValuePath::PolicyId,
            MetadataFieldName::LossSequence => MetadataValuePath::LossId,
            MetadataFieldName::Claimant => MetadataValuePath::ClaimantId,
            MetadataFieldName::ProducerNumber => MetadataValuePath::ProducerId,
            MetadataFieldName::AssignedTo => MetadataValuePath::AssignedToId,
            MetadataFieldName::DocumentDescription => MetadataValuePath::DocumentDescription,
        }
    }

    /// Reset display value and identifier of a field
    pub fn clear_field(&mut self, field: MetadataFieldName) {
        match field {
            MetadataFieldName::PolicyNumber => {
                self.policy_number = None;
                self.policy_id = None;
            }
            MetadataFieldName::LossSequence => {
                self.loss_sequence = None;
                self.loss_id = None;
            }
            MetadataFieldName::Claimant => {
                self.claimant = None;
                self.claimant_id = None;
            }
            MetadataFieldName::ProducerNumber => {
                self.producer_number = None;
                self.producer_id = None;
            }
            MetadataFieldName::AssignedTo => {
                self.assigned_to = None;
                self.assigned_to_id = None;
                self.assigned_to_type = None;
            }
            MetadataFieldName::DocumentDescription => {
                self.document_description = None;
            }
        }
    }

    /// Write a UI value into a field.
    ///
    /// Inputs that do not fit the field (a selection for the description, free
    /// text for a lookup field) are stored as display text with no identifier,
    /// so the validators report them instead of the value disappearing.
    pub fn set_field(&mut self, field: MetadataFieldName, input: FieldInput) {
        match input {
            FieldInput::Clear => self.clear_field(field),
            FieldInput::Text(text) => {
                self.clear_field(field);
                if field == MetadataFieldName::DocumentDescription {
                    self.document_description = Some(text);
                } else {
                    self.set_display(field, text);
                }
            }
            FieldInput::Selection { id, label } => {
                self.clear_field(field);
                match field {
                    MetadataFieldName::PolicyNumber => self.policy_id = Some(id),
                    MetadataFieldName::LossSequence => self.loss_id = Some(id),
                    MetadataFieldName::Claimant => self.claimant_id = Some(id),
                    MetadataFieldName::ProducerNumber => self.producer_id = Some(id),
                    MetadataFieldName::AssignedTo => {
                        self.assigned_to_id = Some(id);
                        self.assigned_to_type = Some(AssigneeType::User);
                    }
                    MetadataFieldName::DocumentDescription => {}
                }
                self.set_display(field, label);
            }
            FieldInput::Assignee { id, label, kind } => {
                self.clear_field(field);
                if field == MetadataFieldName::AssignedTo {
                    self.assigned_to_id = Some(id);
                    self.assigned_to_type = Some(kind);
                }
                self.set_display(field, label);
            }
        }
    }

    fn set_display(&mut self, field: MetadataFieldName, text: String) {
        let slot = match field {
            MetadataFieldName::PolicyNumber => &mut self.policy_number,
            MetadataFieldName::LossSequence => &mut self.loss_sequence,
            MetadataFieldName::Claimant => &mut self.claimant,
            MetadataFieldName::DocumentDescription => &mut self.document_description,
            MetadataFieldName::AssignedTo => &mut self.assigned_to,
            MetadataFieldName::ProducerNumber => &mut self.producer_number,
        };
        *slot = Some(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_wire_format() {
        let json = serde_json::to_string(&MetadataFieldName::LossSequence).unwrap();
        assert_eq!(json, "\"LOSS_SEQUENCE\"");
        assert_eq!(
            MetadataFieldName::parse("claimant"),
            Some(MetadataFieldName::Claimant)
        );
        assert_eq!(MetadataFieldName::parse("nope"), None);
    }

    #[test]
    fn test_selection_sets_display_and_id() {
        let mut m = DocumentMetadata::default();
        m.set_field(
            MetadataFieldName::PolicyNumber,
            FieldInput::Selection {
                id: 0,
                label: "PLCY-1".into(),
            },
        );
        assert_eq!(m.policy_id, Some(0));
        assert_eq!(m.display_value(MetadataFieldName::PolicyNumber), Some("PLCY-1"));
        assert!(m.has_value_at(MetadataValuePath::PolicyId));
    }

    #[test]
    fn test_assignee_replaces_previous_kind() {
        let mut m = DocumentMetadata::default();
        m.set_field(
            MetadataFieldName::AssignedTo,
            FieldInput::Assignee {
                id: 3,
                label: "Claims Team".into(),
                kind: AssigneeType::Group,
            },
        );
        assert_eq!(m.assigned_to_type, Some(AssigneeType::Group));

        m.set_field(
            MetadataFieldName::AssignedTo,
            FieldInput::Selection {
                id: 9,
                label: "Jane Adjuster".into(),
            },
        );
        assert_eq!(m.assigned_to_id, Some(9));
        assert_eq!(m.assigned_to_type, Some(AssigneeType::User));
    }

    #[test]
    fn test_clear_field_resets_both_slots() {
        let mut m = DocumentMetadata {
            loss_sequence: Some("1 - Fire".into()),
            loss_id: Some(4),
            ..Default::default()
        };
        m.clear_field(MetadataFieldName::LossSequence);
        assert_eq!(m, DocumentMetadata::default());
    }

    #[test]
    fn test_camel_case_serialization() {
        let m = DocumentMetadata {
            policy_id: Some(1),
            assigned_to_type: Some(AssigneeType::Group),
            ..Default::default()
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["policyId"], 1);
        assert_eq!(v["assignedToType"], "group");
    }
}
