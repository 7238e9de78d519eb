use serde::{Deserialize, Serialize};

use super::mapping::{map_api_response_to_metadata, map_metadata_to_api_response};
use super::metadata::{AssigneeType, DocumentMetadata};
use crate::domain::common::{AggregateRoot, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Идентификатор документа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl DocumentId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Scanned claim document (PDF) with its claim metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub file_name: String,
    /// Location the viewer loads the PDF from
    pub file_url: String,
    pub mime_type: String,
    pub page_count: Option<i32>,
    pub is_processed: bool,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub processed_by: Option<String>,
    pub metadata: DocumentMetadata,
    pub lifecycle: EntityMetadata,
}

impl Document {
    /// Processed and trashed documents cannot be edited
    pub fn is_read_only(&self) -> bool {
        self.is_processed || self.lifecycle.is_deleted
    }

    pub fn mark_processed(&mut self, actor: &str) {
        self.is_processed = true;
        self.processed_at = Some(chrono::Utc::now());
        self.processed_by = Some(actor.to_string());
    }

    pub fn mark_unprocessed(&mut self) {
        self.is_processed = false;
        self.processed_at = None;
        self.processed_by = None;
    }

    pub fn to_snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id,
            file_name: self.file_name.clone(),
            file_url: self.file_url.clone(),
            mime_type: self.mime_type.clone(),
            page_count: self.page_count,
            is_processed: self.is_processed,
            processed_at: self.processed_at,
            processed_by: self.processed_by.clone(),
            is_deleted: self.lifecycle.is_deleted,
            created_at: self.lifecycle.created_at,
            updated_at: self.lifecycle.updated_at,
            version: self.lifecycle.version,
            metadata: map_metadata_to_api_response(&self.metadata),
        }
    }
}

impl AggregateRoot for Document {
    type Id = DocumentId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.lifecycle
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.lifecycle
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "document"
    }

    fn element_name() -> &'static str {
        "Document"
    }

    fn list_name() -> &'static str {
        "Documents"
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// `metadata` sub-object of a document snapshot (snake_case on the wire)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadataResponse {
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

/// Document as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: DocumentId,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: String,
    pub page_count: Option<i32>,
    pub is_processed: bool,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub processed_by: Option<String>,
    pub is_deleted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub version: i32,
    pub metadata: DocumentMetadataResponse,
}

impl DocumentSnapshot {
    /// Camel-case metadata for the form
    pub fn form_metadata(&self) -> DocumentMetadata {
        map_api_response_to_metadata(&self.metadata)
    }

    pub fn is_read_only(&self) -> bool {
        self.is_processed || self.is_deleted
    }
}

/// Partial update of a document's metadata links
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMetadataRequest {
    pub policy_id: Option<i64>,
    pub loss_id: Option<i64>,
    pub claimant_id: Option<i64>,
    pub document_description: Option<String>,
    pub assigned_to_id: Option<i64>,
    pub assigned_to_type: Option<AssigneeType>,
    pub producer_id: Option<i64>,
}

/// Body of `POST /documents/:id/processed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProcessedRequest {
    pub is_processed: bool,
}

// ============================================================================
// List
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatusFilter {
    /// Not processed, not trashed
    #[default]
    Active,
    Processed,
    Trashed,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListQuery {
    #[serde(default)]
    pub status: DocumentStatusFilter,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Result of `POST /documents/testdata`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDataSummary {
    pub producers: u64,
    pub policies: u64,
    pub losses: u64,
    pub claimants: u64,
    pub users: u64,
    pub groups: u64,
    pub documents: u64,
}

/// Row of the documents list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentListItem {
    pub id: DocumentId,
    pub file_name: String,
    pub policy_number: Option<String>,
    pub document_description: Option<String>,
    pub assigned_to: Option<String>,
    pub is_processed: bool,
    pub is_deleted: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Document> for DocumentListItem {
    fn from(d: &Document) -> Self {
        Self {
            id: d.id,
            file_name: d.file_name.clone(),
            policy_number: d.metadata.policy_number.clone(),
            document_description: d.metadata.document_description.clone(),
            assigned_to: d.metadata.assigned_to.clone(),
            is_processed: d.is_processed,
            is_deleted: d.lifecycle.is_deleted,
            updated_at: d.lifecycle.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub items: Vec<DocumentListItem>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            id: DocumentId(7),
            file_name: "police_report.pdf".into(),
            file_url: "/files/police_report.pdf".into(),
            mime_type: "application/pdf".into(),
            page_count: Some(3),
            is_processed: false,
            processed_at: None,
            processed_by: None,
            metadata: DocumentMetadata {
                policy_number: Some("PLCY-1".into()),
                policy_id: Some(1),
                ..Default::default()
            },
            lifecycle: EntityMetadata::new(),
        }
    }

    #[test]
    fn test_snapshot_nests_snake_case_metadata() {
        let json = serde_json::to_value(sample().to_snapshot()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["metadata"]["policy_number"], "PLCY-1");
        assert_eq!(json["metadata"]["policy_id"], 1);
        assert!(json["metadata"]["loss_id"].is_null());
    }

    #[test]
    fn test_processed_documents_are_read_only() {
        let mut doc = sample();
        assert!(!doc.is_read_only());
        doc.mark_processed("adjuster");
        assert!(doc.is_read_only());
        assert!(doc.to_snapshot().is_read_only());
        doc.mark_unprocessed();
        assert!(doc.processed_at.is_none());
        doc.lifecycle.is_deleted = true;
        assert!(doc.is_read_only());
    }

    #[test]
    fn test_before_write_bumps_version() {
        let mut doc = sample();
        doc.before_write();
        assert_eq!(doc.lifecycle.version, 1);
        assert_eq!(Document::full_name(), "a001_document");
    }

    #[test]
    fn test_list_query_defaults_to_active() {
        let q: DocumentListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.status, DocumentStatusFilter::Active);
    }
}
