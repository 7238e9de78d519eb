use contracts::domain::a001_document::aggregate::{
    Document, DocumentId, DocumentListItem, DocumentListQuery, DocumentListResponse,
    DocumentSnapshot, TestDataSummary, UpdateMetadataRequest,
};
use contracts::domain::a001_document::history::{diff_metadata, DocumentHistoryEntry, HistoryAction};
use contracts::domain::a001_document::field_config::field_config;
use contracts::domain::a001_document::metadata::{DocumentMetadata, MetadataFieldName};
use contracts::domain::common::AggregateRoot;
use sea_orm::TransactionTrait;

use super::error::DocumentError;
use super::history_repository::{self, NewHistoryEntry};
use super::references::{resolve_metadata, validate_relationships, DbReferences};
use super::repository::{self, ListFilter};
use crate::domain::{a002_policy, a003_loss, a004_claimant, a005_producer};
use crate::shared::config;
use crate::shared::data::db::get_connection;
use crate::system::users::repository as users;

/// Policies considered when the list search text looks like a policy number
const SEARCH_POLICY_LIMIT: u64 = 200;

async fn load(id: DocumentId) -> Result<Document, DocumentError> {
    let model = repository::get_by_id(id)
        .await?
        .ok_or(DocumentError::NotFound(id))?;
    let metadata = resolve_metadata(&model.links(), &DbReferences).await?;
    let file_url = config::get().documents.file_url(&model.storage_path);
    Ok(model.into_document(metadata, file_url))
}

/// Metadata edits are allowed on active documents only
pub fn ensure_editable(doc: &Document) -> Result<(), DocumentError> {
    if doc.lifecycle.is_deleted {
        return Err(DocumentError::Conflict("Document is in the trash".into()));
    }
    if doc.is_processed {
        return Err(DocumentError::Conflict(
            "Processed documents cannot be edited".into(),
        ));
    }
    Ok(())
}

/// Field rules of the free-text description (length), checked on the
/// normalized value
pub fn check_description(metadata: &DocumentMetadata) -> Result<(), DocumentError> {
    let field = MetadataFieldName::DocumentDescription;
    let Some(text) = metadata.display_value(field) else {
        return Ok(());
    };
    let config = field_config(field);
    config
        .validation_rules
        .validate_string(text, config.label)
        .map_err(|message| DocumentError::InvalidField { field, message })
}

/// One history row per changed field
pub fn metadata_history(before: &DocumentMetadata, after: &DocumentMetadata) -> Vec<NewHistoryEntry> {
    diff_metadata(before, after)
        .into_iter()
        .map(|change| NewHistoryEntry {
            action: HistoryAction::MetadataUpdated,
            field: Some(change.field),
            old_value: change.old_value,
            new_value: change.new_value,
        })
        .collect()
}

async fn save(doc: &mut Document, actor: &str, entries: &[NewHistoryEntry]) -> Result<(), DocumentError> {
    doc.before_write();
    write_with_history(get_connection(), doc, actor, entries).await?;
    Ok(())
}

/// Document row and its history rows commit together or not at all
async fn write_with_history<C: TransactionTrait>(
    db: &C,
    doc: &Document,
    actor: &str,
    entries: &[NewHistoryEntry],
) -> anyhow::Result<()> {
    let txn = db.begin().await?;
    repository::update(&txn, doc).await?;
    history_repository::insert_many(&txn, doc.id, actor, entries).await?;
    txn.commit().await?;
    Ok(())
}

pub async fn get(id: DocumentId) -> Result<DocumentSnapshot, DocumentError> {
    Ok(load(id).await?.to_snapshot())
}

pub async fn list(query: &DocumentListQuery) -> anyhow::Result<DocumentListResponse> {
    let settings = &config::get().documents;
    let page = query.page.unwrap_or(1).max(1);
    let page_size = settings.page_size(query.page_size);
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let policy_ids = match search {
        Some(text) => a002_policy::repository::search(None, Some(text), SEARCH_POLICY_LIMIT)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect(),
        None => Vec::new(),
    };
    let filter = ListFilter {
        status: query.status,
        search,
        policy_ids,
    };
    let (rows, total) = repository::list_paginated(&filter, page, page_size).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let metadata = resolve_metadata(&row.links(), &DbReferences).await?;
        let file_url = settings.file_url(&row.storage_path);
        let doc = row.into_document(metadata, file_url);
        items.push(DocumentListItem::from(&doc));
    }

    Ok(DocumentListResponse {
        items,
        total,
        page,
        page_size,
    })
}

/// Replace the document's metadata links with `request`
pub async fn update_metadata(
    id: DocumentId,
    request: &UpdateMetadataRequest,
    actor: &str,
) -> Result<DocumentSnapshot, DocumentError> {
    let mut doc = load(id).await?;
    ensure_editable(&doc)?;

    let metadata = validate_relationships(request, &DbReferences).await?;
    check_description(&metadata)?;
    let entries = metadata_history(&doc.metadata, &metadata);
    if entries.is_empty() {
        return Ok(doc.to_snapshot());
    }

    doc.metadata = metadata;
    save(&mut doc, actor, &entries).await?;
    tracing::info!(
        "Document {} metadata updated by {} ({} fields)",
        id,
        actor,
        entries.len()
    );
    Ok(doc.to_snapshot())
}

pub async fn set_processed(
    id: DocumentId,
    is_processed: bool,
    actor: &str,
) -> Result<DocumentSnapshot, DocumentError> {
    let mut doc = load(id).await?;
    if doc.lifecycle.is_deleted {
        return Err(DocumentError::Conflict("Document is in the trash".into()));
    }
    if doc.is_processed == is_processed {
        return Ok(doc.to_snapshot());
    }

    let action = if is_processed {
        doc.mark_processed(actor);
        HistoryAction::Processed
    } else {
        doc.mark_unprocessed();
        HistoryAction::Unprocessed
    };
    save(&mut doc, actor, &[NewHistoryEntry::action(action)]).await?;
    tracing::info!("Document {} {} by {}", id, action.as_str(), actor);
    Ok(doc.to_snapshot())
}

/// Soft delete
pub async fn trash(id: DocumentId, actor: &str) -> Result<DocumentSnapshot, DocumentError> {
    let mut doc = load(id).await?;
    if doc.lifecycle.is_deleted {
        return Err(DocumentError::Conflict("Document is already in the trash".into()));
    }
    doc.lifecycle.is_deleted = true;
    save(&mut doc, actor, &[NewHistoryEntry::action(HistoryAction::Trashed)]).await?;
    tracing::info!("Document {} moved to trash by {}", id, actor);
    Ok(doc.to_snapshot())
}

pub async fn restore(id: DocumentId, actor: &str) -> Result<DocumentSnapshot, DocumentError> {
    let mut doc = load(id).await?;
    if !doc.lifecycle.is_deleted {
        return Err(DocumentError::Conflict("Document is not in the trash".into()));
    }
    doc.lifecycle.is_deleted = false;
    save(&mut doc, actor, &[NewHistoryEntry::action(HistoryAction::Restored)]).await?;
    tracing::info!("Document {} restored by {}", id, actor);
    Ok(doc.to_snapshot())
}

pub async fn history(id: DocumentId) -> Result<Vec<DocumentHistoryEntry>, DocumentError> {
    if repository::get_by_id(id).await?.is_none() {
        return Err(DocumentError::NotFound(id));
    }
    Ok(history_repository::list_by_document(id).await?)
}

const DEMO_INSUREDS: [&str; 3] = ["Acme Logistics", "Northwind Traders", "Contoso Bakery"];
const DEMO_LOSSES: [&str; 3] = ["Vehicle Accident", "Water Damage", "Theft"];
const DEMO_CLAIMANTS: [&str; 3] = ["John Doe", "Mary Major", "Richard Roe"];
const DEMO_USERS: [(&str, &str); 2] = [("jadjuster", "Jane Adjuster"), ("pexaminer", "Paul Examiner")];
const DEMO_GROUPS: [&str; 2] = ["Claims Team", "Fraud Unit"];

/// Seed producers, policies with losses and claimants, assignees and a batch
/// of unprocessed documents. Numbers continue after existing rows, so the
/// seed can run more than once.
pub async fn insert_test_data() -> anyhow::Result<TestDataSummary> {
    let mut summary = TestDataSummary::default();
    let producer_base = a005_producer::repository::count().await?;
    let user_base = users::count_users().await?;

    for (p, insured) in DEMO_INSUREDS.into_iter().enumerate() {
        let n = producer_base + p as u64 + 1;
        let producer_id = a005_producer::repository::insert(
            &format!("AG-{}", 789_000 + n),
            &format!("{} Brokers", insured.split_whitespace().next().unwrap_or(insured)),
        )
        .await?;
        summary.producers += 1;

        let policy_id = a002_policy::repository::insert(
            &format!("PLCY-{}", 12_000 + n),
            insured,
            Some(producer_id),
        )
        .await?;
        summary.policies += 1;

        for (l, description) in DEMO_LOSSES.iter().enumerate().take(p + 1) {
            let loss_id = a003_loss::repository::insert(policy_id, l as i32 + 1, description).await?;
            summary.losses += 1;
            for (c, name) in DEMO_CLAIMANTS.iter().enumerate().take(l + 1) {
                a004_claimant::repository::insert(loss_id, c as i32 + 1, name).await?;
                summary.claimants += 1;
            }
        }
    }

    for (username, full_name) in DEMO_USERS {
        let username = if user_base == 0 {
            username.to_string()
        } else {
            format!("{}{}", username, user_base)
        };
        users::insert_user(&username, Some(full_name)).await?;
        summary.users += 1;
    }
    if user_base == 0 {
        for name in DEMO_GROUPS {
            users::insert_group(name).await?;
            summary.groups += 1;
        }
    }

    for i in 1..=12u64 {
        let file_name = format!("claim_scan_{:04}.pdf", producer_base * 12 + i);
        repository::insert(&file_name, &format!("scans/{}", file_name), Some((i % 5 + 1) as i32))
            .await?;
        summary.documents += 1;
    }

    tracing::info!("Test data inserted: {:?}", summary);
    Ok(summary)
}
