//! Conversions between the form's metadata and the API's snake_case shapes

use super::aggregate::{DocumentMetadataResponse, UpdateMetadataRequest};
use super::metadata::DocumentMetadata;

/// Form metadata → update payload (identifiers and free text only)
pub fn map_metadata_to_api_request(metadata: &DocumentMetadata) -> UpdateMetadataRequest {
    UpdateMetadataRequest {
        policy_id: metadata.policy_id,
        loss_id: metadata.loss_id,
        claimant_id: metadata.claimant_id,
        document_description: metadata.document_description.clone(),
        assigned_to_id: metadata.assigned_to_id,
        assigned_to_type: metadata.assigned_to_type,
        producer_id: metadata.producer_id,
    }
}

/// Snapshot `metadata` object → form metadata
pub fn map_api_response_to_metadata(response: &DocumentMetadataResponse) -> DocumentMetadata {
    DocumentMetadata {
        policy_number: response.policy_number.clone(),
        policy_id: response.policy_id,
        loss_sequence: response.loss_sequence.clone(),
        loss_id: response.loss_id,
        claimant: response.claimant.clone(),
        claimant_id: response.claimant_id,
        producer_number: response.producer_number.clone(),
        producer_id: response.producer_id,
        document_description: response.document_description.clone(),
        assigned_to: response.assigned_to.clone(),
        assigned_to_id: response.assigned_to_id,
        assigned_to_type: response.assigned_to_type,
    }
}

/// Inverse of [`map_api_response_to_metadata`]
pub fn map_metadata_to_api_response(metadata: &DocumentMetadata) -> DocumentMetadataResponse {
    DocumentMetadataResponse {
        policy_number: metadata.policy_number.clone(),
        policy_id: metadata.policy_id,
        loss_sequence: metadata.loss_sequence.clone(),
        loss_id: metadata.loss_id,
        claimant: metadata.claimant.clone(),
        claimant_id: metadata.claimant_id,
        producer_number: metadata.producer_number.clone(),
        producer_id: metadata.producer_id,
        document_description: metadata.document_description.clone(),
        assigned_to: metadata.assigned_to.clone(),
        assigned_to_id: metadata.assigned_to_id,
        assigned_to_type: metadata.assigned_to_type,
    }
}

impl From<&DocumentMetadataResponse> for DocumentMetadata {
    fn from(r: &DocumentMetadataResponse) -> Self {
        map_api_response_to_metadata(r)
    }
}

impl From<&DocumentMetadata> for UpdateMetadataRequest {
    fn from(m: &DocumentMetadata) -> Self {
        map_metadata_to_api_request(m)
    }
}
