//! Field type enumeration for metadata forms

use serde::{Deserialize, Serialize};

/// Widget category used to render a metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,           // Free single-line text
    Textarea,       // Free multi-line text
    Autocomplete,   // Searchable lookup backed by an options source
    Select,         // Short fixed list backed by an options source
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Autocomplete => "autocomplete",
            Self::Select => "select",
        }
    }

    /// Whether the field takes its values from a lookup list
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Autocomplete | Self::Select)
    }
}
