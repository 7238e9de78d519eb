//! Lookup options for autocomplete/select metadata fields

use serde::{Deserialize, Serialize};

use super::field_config::{self, option_scopes};
use super::metadata::{AssigneeType, DocumentMetadata, FieldInput, MetadataFieldName, MetadataValuePath};

/// One entry of an option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataOption {
    pub id: i64,
    pub label: String,
    /// Value stored in the form; `user:<id>` / `group:<id>` for assignees
    pub value: String,
}

impl MetadataOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id,
            value: label.clone(),
            label,
        }
    }

    pub fn assignee(id: i64, label: impl Into<String>, kind: AssigneeType) -> Self {
        Self {
            id,
            label: label.into(),
            value: format!("{}:{}", kind.as_str(), id),
        }
    }

    /// Assignee kind encoded in `value`
    pub fn assignee_type(&self) -> Option<AssigneeType> {
        self.value
            .split_once(':')
            .and_then(|(kind, _)| AssigneeType::parse(kind))
    }

    /// Form input produced by picking this option
    pub fn to_field_input(&self) -> FieldInput {
        match self.assignee_type() {
            Some(kind) => FieldInput::Assignee {
                id: self.id,
                label: self.label.clone(),
                kind,
            },
            None => FieldInput::Selection {
                id: self.id,
                label: self.label.clone(),
            },
        }
    }
}

/// Parent values scoping an options lookup (query string of the options endpoint)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsContext {
    pub policy_id: Option<i64>,
    pub loss_id: Option<i64>,
    pub producer_id: Option<i64>,
    /// Free-text filter typed into an autocomplete
    pub query: Option<String>,
}

impl OptionsContext {
    /// Context carrying the parent identifiers `field` is scoped by
    pub fn for_field(field: MetadataFieldName, metadata: &DocumentMetadata) -> Self {
        let mut ctx = Self::default();
        let gate = field_config::get_dependency(field).map(|d| d.parent_value_path);
        let scope = option_scopes()
            .iter()
            .find(|s| s.field == field)
            .map(|s| s.parent_value_path);
        for path in gate.into_iter().chain(scope) {
            let id = metadata.identifier(path);
            match path {
                MetadataValuePath::PolicyId => ctx.policy_id = id,
                MetadataValuePath::LossId => ctx.loss_id = id,
                MetadataValuePath::ProducerId => ctx.producer_id = id,
                _ => {}
            }
        }
        ctx
    }

    /// Query string for `GET /api/a001/metadata/options/:field`
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = self.policy_id {
            parts.push(format!("policy_id={}", id));
        }
        if let Some(id) = self.loss_id {
            parts.push(format!("loss_id={}", id));
        }
        if let Some(id) = self.producer_id {
            parts.push(format!("producer_id={}", id));
        }
        if let Some(q) = self.query.as_deref().filter(|q| !q.is_empty()) {
            parts.push(format!("query={}", urlencoding::encode(q)));
        }
        parts.join("&")
    }
}
