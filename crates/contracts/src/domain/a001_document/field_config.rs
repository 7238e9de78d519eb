//! Static field table of the document metadata form
//!
//! Single source of truth for labels, widgets, requiredness, ordering and the
//! dependency edges between fields. Changing the field set is a code change.

use super::metadata::{MetadataFieldName, MetadataValuePath};
use crate::shared::metadata::{FieldType, ValidationRules};

/// Shape of policy numbers: alphabetic prefix, hyphen, digits (`PLCY-12345`)
pub const POLICY_NUMBER_PATTERN: &str = r"^[A-Za-z]+-[0-9]+$";
/// Shape of producer numbers (`AG-789456`)
pub const PRODUCER_NUMBER_PATTERN: &str = r"^[A-Za-z]+-[0-9]+$";
/// Shape of loss and claimant labels: digits, " - ", free text (`1 - Vehicle Accident`)
pub const SEQUENCE_LABEL_PATTERN: &str = r"^[0-9]+ - .+$";

pub const DOCUMENT_DESCRIPTION_MAX_LENGTH: usize = 500;

/// Configuration of one metadata field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConfig {
    pub name: MetadataFieldName,
    pub label: &'static str,
    pub field_type: FieldType,
    pub placeholder: &'static str,
    pub required: bool,
    pub depends_on: Option<MetadataFieldName>,
    pub order: u8,
    pub validation_rules: ValidationRules,
}

/// Directed edge: `field` can only be filled once `depends_on` has an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDependency {
    pub field: MetadataFieldName,
    pub depends_on: MetadataFieldName,
    pub parent_value_path: MetadataValuePath,
}

/// Options of `field` are filtered by the parent's identifier when it is set,
/// but the field stays usable without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionScope {
    pub field: MetadataFieldName,
    pub scoped_by: MetadataFieldName,
    pub parent_value_path: MetadataValuePath,
}

// Sorted by `order`.
static FIELD_CONFIGS: [FieldConfig; 6] = [
    FieldConfig {
        name: MetadataFieldName::ProducerNumber,
        label: "Producer",
        field_type: FieldType::Autocomplete,
        placeholder: "Search producer (e.g. AG-789456)",
        required: false,
        depends_on: None,
        order: 1,
        validation_rules: ValidationRules::none()
            .with_pattern(PRODUCER_NUMBER_PATTERN, "Producer number must look like AG-789456"),
    },
    FieldConfig {
        name: MetadataFieldName::PolicyNumber,
        label: "Policy Number",
        field_type: FieldType::Autocomplete,
        placeholder: "Search policy (e.g. PLCY-12345)",
        required: true,
        depends_on: None,
        order: 2,
        validation_rules: ValidationRules::required()
            .with_pattern(POLICY_NUMBER_PATTERN, "Policy number must look like PLCY-12345"),
    },
    FieldConfig {
        name: MetadataFieldName::LossSequence,
        label: "Loss",
        field_type: FieldType::Select,
        placeholder: "Select loss",
        required: false,
        depends_on: Some(MetadataFieldName::PolicyNumber),
        order: 3,
        validation_rules: ValidationRules::none()
            .with_pattern(SEQUENCE_LABEL_PATTERN, "Loss must look like \"1 - Vehicle Accident\""),
    },
    FieldConfig {
        name: MetadataFieldName::Claimant,
        label: "Claimant",
        field_type: FieldType::Select,
        placeholder: "Select claimant",
        required: false,
        depends_on: Some(MetadataFieldName::LossSequence),
        order: 4,
        validation_rules: ValidationRules::none()
            .with_pattern(SEQUENCE_LABEL_PATTERN, "Claimant must look like \"1 - John Doe\""),
    },
    FieldConfig {
        name: MetadataFieldName::DocumentDescription,
        label: "Document Description",
        field_type: FieldType::Textarea,
        placeholder: "Describe the document",
        required: true,
        depends_on: None,
        order: 5,
        validation_rules: ValidationRules::required().with_max_length(DOCUMENT_DESCRIPTION_MAX_LENGTH),
    },
    FieldConfig {
        name: MetadataFieldName::AssignedTo,
        label: "Assigned To",
        field_type: FieldType::Autocomplete,
        placeholder: "Assign to user or group",
        required: false,
        depends_on: None,
        order: 6,
        validation_rules: ValidationRules::none(),
    },
];

static FIELD_DEPENDENCIES: [FieldDependency; 2] = [
    FieldDependency {
        field: MetadataFieldName::LossSequence,
        depends_on: MetadataFieldName::PolicyNumber,
        parent_value_path: MetadataValuePath::PolicyId,
    },
    FieldDependency {
        field: MetadataFieldName::Claimant,
        depends_on: MetadataFieldName::LossSequence,
        parent_value_path: MetadataValuePath::LossId,
    },
];

// Policy ↔ producer is a filter, not a gate: see DESIGN.md.
static OPTION_SCOPES: [OptionScope; 1] = [OptionScope {
    field: MetadataFieldName::PolicyNumber,
    scoped_by: MetadataFieldName::ProducerNumber,
    parent_value_path: MetadataValuePath::ProducerId,
}];

/// All field configs, ordered for display
pub fn field_configs() -> &'static [FieldConfig] {
    &FIELD_CONFIGS
}

pub fn field_config(name: MetadataFieldName) -> &'static FieldConfig {
    // the table covers the whole closed enum (checked in tests)
    FIELD_CONFIGS
        .iter()
        .find(|c| c.name == name)
        .unwrap_or(&FIELD_CONFIGS[0])
}

pub fn field_dependencies() -> &'static [FieldDependency] {
    &FIELD_DEPENDENCIES
}

/// Dependency edge of `field`, `None` for root fields
pub fn get_dependency(field: MetadataFieldName) -> Option<&'static FieldDependency> {
    FIELD_DEPENDENCIES.iter().find(|d| d.field == field)
}

/// Fields whose dependency edge points at `parent`
pub fn dependents_of(parent: MetadataFieldName) -> impl Iterator<Item = MetadataFieldName> {
    FIELD_DEPENDENCIES
        .iter()
        .filter(move |d| d.depends_on == parent)
        .map(|d| d.field)
}

pub fn option_scopes() -> &'static [OptionScope] {
    &OPTION_SCOPES
}

/// Fields whose option lists are filtered by `parent`
pub fn scoped_by(parent: MetadataFieldName) -> impl Iterator<Item = MetadataFieldName> {
    OPTION_SCOPES
        .iter()
        .filter(move |s| s.scoped_by == parent)
        .map(|s| s.field)
}
