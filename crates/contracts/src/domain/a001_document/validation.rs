//! Field validators and the form-level aggregator
//!
//! Every validator is a pure function of `(value, metadata)` that returns the
//! first problem found or `None`. Nothing here panics or returns `Result`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

use super::dependency::get_field_dependency;
use super::field_config::{POLICY_NUMBER_PATTERN, PRODUCER_NUMBER_PATTERN, SEQUENCE_LABEL_PATTERN};
use super::metadata::{DocumentMetadata, FieldValue, MetadataFieldName};

static POLICY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(POLICY_NUMBER_PATTERN).expect("policy number pattern"));
static PRODUCER_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PRODUCER_NUMBER_PATTERN).expect("producer number pattern"));
static SEQUENCE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SEQUENCE_LABEL_PATTERN).expect("sequence label pattern"));

/// Field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Policy number must look like PLCY-12345")]
    InvalidPolicyNumber,

    #[error("Loss must look like \"1 - Vehicle Accident\"")]
    InvalidLossSequence,

    #[error("Claimant must look like \"1 - John Doe\"")]
    InvalidClaimant,

    #[error("Producer number must look like AG-789456")]
    InvalidProducerNumber,

    #[error("Select a policy before choosing a loss")]
    PolicyRequiredForLoss,

    #[error("Select a loss before choosing a claimant")]
    LossRequiredForClaimant,
}

impl FieldError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::InvalidPolicyNumber => "INVALID_POLICY_NUMBER",
            Self::InvalidLossSequence => "INVALID_LOSS_SEQUENCE",
            Self::InvalidClaimant => "INVALID_CLAIMANT",
            Self::InvalidProducerNumber => "INVALID_PRODUCER_NUMBER",
            Self::PolicyRequiredForLoss => "POLICY_REQUIRED_FOR_LOSS",
            Self::LossRequiredForClaimant => "LOSS_REQUIRED_FOR_CLAIMANT",
        }
    }

    /// Dependency-gate failures win over shape failures
    pub fn is_dependency_error(&self) -> bool {
        matches!(self, Self::PolicyRequiredForLoss | Self::LossRequiredForClaimant)
    }
}

/// Validation result of the whole form; a missing key means the field is valid
pub type ValidationErrors = BTreeMap<MetadataFieldName, FieldError>;

/// Validator signature shared by all fields
pub type FieldValidator = fn(Option<&str>, &DocumentMetadata) -> Option<FieldError>;

/// Loose presence check: only a missing value or empty text is absent.
/// `Id(0)` and `Flag(false)` are present.
pub fn is_required(value: Option<FieldValue<'_>>) -> bool {
    !matches!(value, None | Some(FieldValue::Text("")))
}

fn is_blank(value: Option<&str>) -> bool {
    !is_required(value.map(FieldValue::Text))
}

pub fn validate_policy_number(value: Option<&str>) -> Option<FieldError> {
    match value {
        v if is_blank(v) => Some(FieldError::Required),
        Some(v) if !POLICY_NUMBER_RE.is_match(v) => Some(FieldError::InvalidPolicyNumber),
        _ => None,
    }
}

/// Optional when unset; a value needs a resolved policy and a `N - label` shape
pub fn validate_loss_sequence(value: Option<&str>, metadata: &DocumentMetadata) -> Option<FieldError> {
    match value {
        v if is_blank(v) => None,
        _ if metadata.policy_id.is_none() => Some(FieldError::PolicyRequiredForLoss),
        Some(v) if SEQUENCE_LABEL_RE.is_match(v) => None,
        _ => Some(FieldError::InvalidLossSequence),
    }
}

pub fn validate_claimant(value: Option<&str>, metadata: &DocumentMetadata) -> Option<FieldError> {
    match value {
        v if is_blank(v) => None,
        _ if metadata.loss_id.is_none() => Some(FieldError::LossRequiredForClaimant),
        Some(v) if SEQUENCE_LABEL_RE.is_match(v) => None,
        _ => Some(FieldError::InvalidClaimant),
    }
}

pub fn validate_document_description(value: Option<&str>) -> Option<FieldError> {
    is_blank(value).then_some(FieldError::Required)
}

/// Assignment is optional and free-form
pub fn validate_assigned_to(_value: Option<&str>) -> Option<FieldError> {
    None
}

pub fn validate_producer_number(value: Option<&str>) -> Option<FieldError> {
    match value {
        None => None,
        Some(v) if PRODUCER_NUMBER_RE.is_match(v) => None,
        Some(_) => Some(FieldError::InvalidProducerNumber),
    }
}

/// Gate check: the dependency error of `field` when it holds a value but its
/// parent does not. An empty child never trips the gate.
pub fn validate_dependent_field(
    field: MetadataFieldName,
    value: Option<&str>,
    metadata: &DocumentMetadata,
) -> Option<FieldError> {
    let dep = get_field_dependency(field)?;
    if is_blank(value) || metadata.has_value_at(dep.parent_value_path) {
        return None;
    }
    match field {
        MetadataFieldName::LossSequence => Some(FieldError::PolicyRequiredForLoss),
        MetadataFieldName::Claimant => Some(FieldError::LossRequiredForClaimant),
        _ => None,
    }
}

fn no_op(_value: Option<&str>, _metadata: &DocumentMetadata) -> Option<FieldError> {
    None
}

/// Dispatch table from field to validator.
///
/// The enum is closed, so every arm is explicit; fields added later start with
/// the no-op validator until one is written.
pub fn get_validator_for_field(field: MetadataFieldName) -> FieldValidator {
    match field {
        MetadataFieldName::PolicyNumber => |v, _| validate_policy_number(v),
        MetadataFieldName::LossSequence => validate_loss_sequence,
        MetadataFieldName::Claimant => validate_claimant,
        MetadataFieldName::DocumentDescription => |v, _| validate_document_description(v),
        MetadataFieldName::AssignedTo => |v, _| validate_assigned_to(v),
        MetadataFieldName::ProducerNumber => |v, _| validate_producer_number(v),
    }
}

/// Validator used for field names that do not parse into [`MetadataFieldName`]
pub fn validator_for_name(name: &str) -> FieldValidator {
    MetadataFieldName::parse(name)
        .map(get_validator_for_field)
        .unwrap_or(no_op)
}

/// Dependency gate first, then the field's own validator
pub fn validate_metadata_field(
    field: MetadataFieldName,
    value: Option<&str>,
    metadata: &DocumentMetadata,
) -> Option<FieldError> {
    validate_dependent_field(field, value, metadata)
        .or_else(|| get_validator_for_field(field)(value, metadata))
}

/// Full pass over every field. Always rebuilt from scratch.
pub fn validate_metadata_form(metadata: &DocumentMetadata) -> ValidationErrors {
    MetadataFieldName::ALL
        .into_iter()
        .filter_map(|field| {
            validate_metadata_field(field, metadata.display_value(field), metadata)
                .map(|err| (field, err))
        })
        .collect()
}

pub fn is_form_valid(metadata: &DocumentMetadata) -> bool {
    validate_metadata_form(metadata).is_empty()
}

/// Error map rendered as `field -> message`, the shape the UI and API print
pub fn error_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .iter()
        .map(|(field, err)| (field.as_str().to_string(), err.to_string()))
        .collect()
}
