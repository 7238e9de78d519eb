use chrono::Utc;
use contracts::domain::a001_document::aggregate::{
    Document, DocumentId, DocumentStatusFilter, UpdateMetadataRequest,
};
use contracts::domain::a001_document::metadata::{AssigneeType, DocumentMetadata};
use contracts::domain::common::EntityMetadata;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub file_name: String,
    pub storage_path: String,
    pub mime_type: String,
    pub page_count: Option<i32>,
    pub is_processed: bool,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub processed_by: Option<String>,
    pub policy_id: Option<i64>,
    pub loss_id: Option<i64>,
    pub claimant_id: Option<i64>,
    pub producer_id: Option<i64>,
    pub document_description: Option<String>,
    pub assigned_to_id: Option<i64>,
    pub assigned_to_type: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored metadata links, in the shape of an update request
    pub fn links(&self) -> UpdateMetadataRequest {
        UpdateMetadataRequest {
            policy_id: self.policy_id,
            loss_id: self.loss_id,
            claimant_id: self.claimant_id,
            document_description: self.document_description.clone(),
            // an unreadable type drops the whole assignment
            assigned_to_id: self
                .assigned_to_type
                .as_deref()
                .and_then(AssigneeType::parse)
                .and(self.assigned_to_id),
            assigned_to_type: self
                .assigned_to_id
                .and(self.assigned_to_type.as_deref().and_then(AssigneeType::parse)),
            producer_id: self.producer_id,
        }
    }

    /// Aggregate from the row plus its resolved metadata
    pub fn into_document(self, metadata: DocumentMetadata, file_url: String) -> Document {
        let lifecycle = EntityMetadata {
            created_at: self.created_at.unwrap_or_else(Utc::now),
            updated_at: self.updated_at.unwrap_or_else(Utc::now),
            is_deleted: self.is_deleted,
            version: self.version,
        };
        Document {
            id: DocumentId(self.id),
            file_name: self.file_name,
            file_url,
            mime_type: self.mime_type,
            page_count: self.page_count,
            is_processed: self.is_processed,
            processed_at: self.processed_at,
            processed_by: self.processed_by,
            metadata,
            lifecycle,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn status_condition(status: DocumentStatusFilter) -> Condition {
    match status {
        DocumentStatusFilter::Active => Condition::all()
            .add(Column::IsDeleted.eq(false))
            .add(Column::IsProcessed.eq(false)),
        DocumentStatusFilter::Processed => Condition::all()
            .add(Column::IsDeleted.eq(false))
            .add(Column::IsProcessed.eq(true)),
        DocumentStatusFilter::Trashed => Condition::all().add(Column::IsDeleted.eq(true)),
        DocumentStatusFilter::All => Condition::all(),
    }
}

/// Text search over file name and description, plus documents linked to any
/// of `policy_ids` (policies whose number matched the same text)
pub struct ListFilter<'a> {
    pub status: DocumentStatusFilter,
    pub search: Option<&'a str>,
    pub policy_ids: Vec<i64>,
}

/// Rows to skip for a 1-based `page`; page 0 reads as page 1. Capped at the
/// largest offset SQLite accepts.
fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(page_size)
        .min(i64::MAX as u64)
}

/// One page of documents, newest first, and the total row count
pub async fn list_paginated(
    filter: &ListFilter<'_>,
    page: u64,
    page_size: u64,
) -> anyhow::Result<(Vec<Model>, u64)> {
    let mut query = Entity::find().filter(status_condition(filter.status));

    if let Some(search) = filter.search.map(str::trim).filter(|s| !s.is_empty()) {
        let mut any = Condition::any()
            .add(Column::FileName.contains(search))
            .add(Column::DocumentDescription.contains(search));
        if !filter.policy_ids.is_empty() {
            any = any.add(Column::PolicyId.is_in(filter.policy_ids.clone()));
        }
        query = query.filter(any);
    }

    let total = query.clone().count(conn()).await?;

    let items = query
        .order_by_desc(Column::UpdatedAt)
        .order_by_desc(Column::Id)
        .offset(page_offset(page, page_size))
        .limit(page_size)
        .all(conn())
        .await?;

    Ok((items, total))
}

pub async fn get_by_id(id: DocumentId) -> anyhow::Result<Option<Model>> {
    Ok(Entity::find_by_id(id.value()).one(conn()).await?)
}

/// New scanned document; metadata starts empty
pub async fn insert(
    file_name: &str,
    storage_path: &str,
    page_count: Option<i32>,
) -> anyhow::Result<DocumentId> {
    let now = Utc::now();
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        file_name: Set(file_name.to_string()),
        storage_path: Set(storage_path.to_string()),
        mime_type: Set("application/pdf".to_string()),
        page_count: Set(page_count),
        is_processed: Set(false),
        processed_at: Set(None),
        processed_by: Set(None),
        policy_id: Set(None),
        loss_id: Set(None),
        claimant_id: Set(None),
        producer_id: Set(None),
        document_description: Set(None),
        assigned_to_id: Set(None),
        assigned_to_type: Set(None),
        is_deleted: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        version: Set(0),
    };
    let model = active.insert(conn()).await?;
    Ok(DocumentId(model.id))
}

/// Write the mutable part of the aggregate back on `db` (a transaction when
/// history rows go with it)
pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Document) -> anyhow::Result<()> {
    let m = &aggregate.metadata;
    let active = ActiveModel {
        id: Set(aggregate.id.value()),
        is_processed: Set(aggregate.is_processed),
        processed_at: Set(aggregate.processed_at),
        processed_by: Set(aggregate.processed_by.clone()),
        policy_id: Set(m.policy_id),
        loss_id: Set(m.loss_id),
        claimant_id: Set(m.claimant_id),
        producer_id: Set(m.producer_id),
        document_description: Set(m.document_description.clone()),
        assigned_to_id: Set(m.assigned_to_id),
        assigned_to_type: Set(m.assigned_to_type.map(|t| t.as_str().to_string())),
        is_deleted: Set(aggregate.lifecycle.is_deleted),
        updated_at: Set(Some(aggregate.lifecycle.updated_at)),
        version: Set(aggregate.lifecycle.version),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Model {
        Model {
            id: 1,
            file_name: "claim.pdf".into(),
            storage_path: "2024/claim.pdf".into(),
            mime_type: "application/pdf".into(),
            page_count: Some(2),
            is_processed: false,
            processed_at: None,
            processed_by: None,
            policy_id: Some(1),
            loss_id: None,
            claimant_id: None,
            producer_id: None,
            document_description: Some("Invoice".into()),
            assigned_to_id: Some(5),
            assigned_to_type: Some("group".into()),
            is_deleted: false,
            created_at: None,
            updated_at: None,
            version: 3,
        }
    }

    #[test]
    fn test_links_read_assignment() {
        let links = row().links();
        assert_eq!(links.policy_id, Some(1));
        assert_eq!(links.assigned_to_id, Some(5));
        assert_eq!(links.assigned_to_type, Some(AssigneeType::Group));
    }

    #[test]
    fn test_half_assignment_is_dropped() {
        let mut bad_type = row();
        bad_type.assigned_to_type = Some("robot".into());
        let links = bad_type.links();
        assert_eq!(links.assigned_to_id, None);
        assert_eq!(links.assigned_to_type, None);

        let mut no_id = row();
        no_id.assigned_to_id = None;
        assert_eq!(no_id.links().assigned_to_type, None);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(u64::MAX, 100), i64::MAX as u64);
    }

    #[test]
    fn test_into_document_keeps_lifecycle() {
        let doc = row().into_document(DocumentMetadata::default(), "/files/2024/claim.pdf".into());
        assert_eq!(doc.id, DocumentId(1));
        assert_eq!(doc.lifecycle.version, 3);
        assert_eq!(doc.file_url, "/files/2024/claim.pdf");
    }
}
