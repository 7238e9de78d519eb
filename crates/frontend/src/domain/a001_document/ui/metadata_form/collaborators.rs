//! External services the metadata form depends on

use async_trait::async_trait;
use contracts::domain::a001_document::aggregate::{DocumentId, DocumentSnapshot, UpdateMetadataRequest};
use contracts::domain::a001_document::metadata::MetadataFieldName;
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};

use crate::domain::a001_document::model;
use crate::shared::api_utils::ApiError;

/// Options lookup for autocomplete/select fields
#[async_trait(?Send)]
pub trait MetadataOptionsSource {
    async fn get_metadata_options(
        &self,
        field: MetadataFieldName,
        context: &OptionsContext,
    ) -> Result<Vec<MetadataOption>, ApiError>;
}

/// Persists metadata and returns the reloaded document
#[async_trait(?Send)]
pub trait MetadataSaver {
    async fn update_metadata(
        &self,
        document_id: DocumentId,
        payload: &UpdateMetadataRequest,
    ) -> Result<DocumentSnapshot, ApiError>;
}

/// Both collaborators backed by the backend HTTP API
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMetadataApi;

#[async_trait(?Send)]
impl MetadataOptionsSource for HttpMetadataApi {
    async fn get_metadata_options(
        &self,
        field: MetadataFieldName,
        context: &OptionsContext,
    ) -> Result<Vec<MetadataOption>, ApiError> {
        model::fetch_metadata_options(field, context).await
    }
}

#[async_trait(?Send)]
impl MetadataSaver for HttpMetadataApi {
    async fn update_metadata(
        &self,
        document_id: DocumentId,
        payload: &UpdateMetadataRequest,
    ) -> Result<DocumentSnapshot, ApiError> {
        model::update_metadata(document_id, payload).await
    }
}
