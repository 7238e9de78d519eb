//! HTTP calls of the documents view

use contracts::domain::a001_document::aggregate::{
    DocumentId, DocumentListQuery, DocumentListResponse, DocumentSnapshot, DocumentStatusFilter,
    SetProcessedRequest, TestDataSummary, UpdateMetadataRequest,
};
use contracts::domain::a001_document::history::DocumentHistoryEntry;
use contracts::domain::a001_document::metadata::MetadataFieldName;
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};

use crate::shared::api_utils::{get_json, send_json, ApiError};

fn status_param(status: DocumentStatusFilter) -> &'static str {
    match status {
        DocumentStatusFilter::Active => "active",
        DocumentStatusFilter::Processed => "processed",
        DocumentStatusFilter::Trashed => "trashed",
        DocumentStatusFilter::All => "all",
    }
}

/// Query string of the list endpoint
pub fn list_query_string(query: &DocumentListQuery) -> String {
    let mut parts = vec![format!("status={}", status_param(query.status))];
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(format!("search={}", urlencoding::encode(search.trim())));
    }
    if let Some(page) = query.page {
        parts.push(format!("page={}", page));
    }
    if let Some(size) = query.page_size {
        parts.push(format!("page_size={}", size));
    }
    parts.join("&")
}

pub async fn fetch_documents(query: &DocumentListQuery) -> Result<DocumentListResponse, ApiError> {
    get_json(&format!("/api/a001/documents?{}", list_query_string(query))).await
}

pub async fn fetch_document(id: DocumentId) -> Result<DocumentSnapshot, ApiError> {
    get_json(&format!("/api/a001/documents/{}", id)).await
}

pub async fn update_metadata(
    id: DocumentId,
    payload: &UpdateMetadataRequest,
) -> Result<DocumentSnapshot, ApiError> {
    send_json("PUT", &format!("/api/a001/documents/{}/metadata", id), payload).await
}

pub async fn set_processed(id: DocumentId, is_processed: bool) -> Result<DocumentSnapshot, ApiError> {
    send_json(
        "POST",
        &format!("/api/a001/documents/{}/processed", id),
        &SetProcessedRequest { is_processed },
    )
    .await
}

pub async fn trash_document(id: DocumentId) -> Result<DocumentSnapshot, ApiError> {
    send_json("DELETE", &format!("/api/a001/documents/{}", id), &()).await
}

pub async fn restore_document(id: DocumentId) -> Result<DocumentSnapshot, ApiError> {
    send_json("POST", &format!("/api/a001/documents/{}/restore", id), &()).await
}

pub async fn fetch_history(id: DocumentId) -> Result<Vec<DocumentHistoryEntry>, ApiError> {
    get_json(&format!("/api/a001/documents/{}/history", id)).await
}

/// Seed demo policies, losses, claimants, people and documents
pub async fn generate_test_data() -> Result<TestDataSummary, ApiError> {
    send_json("POST", "/api/a001/documents/testdata", &()).await
}

pub async fn fetch_metadata_options(
    field: MetadataFieldName,
    context: &OptionsContext,
) -> Result<Vec<MetadataOption>, ApiError> {
    let query = context.to_query_string();
    let path = if query.is_empty() {
        format!("/api/a001/metadata/options/{}", field.as_str())
    } else {
        format!("/api/a001/metadata/options/{}?{}", field.as_str(), query)
    };
    get_json(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_string() {
        let q = DocumentListQuery {
            status: DocumentStatusFilter::Trashed,
            search: Some(" police report ".into()),
            page: Some(2),
            page_size: None,
        };
        assert_eq!(list_query_string(&q), "status=trashed&search=police%20report&page=2");
        assert_eq!(list_query_string(&DocumentListQuery::default()), "status=active");
    }
}
