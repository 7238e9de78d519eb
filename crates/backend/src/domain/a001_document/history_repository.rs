use chrono::Utc;
use contracts::domain::a001_document::aggregate::DocumentId;
use contracts::domain::a001_document::history::{DocumentHistoryEntry, HistoryAction};
use contracts::domain::a001_document::metadata::MetadataFieldName;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_document_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub document_id: i64,
    pub action: String,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `None` for rows with an action this build does not know
    fn into_entry(self) -> Option<DocumentHistoryEntry> {
        let action = HistoryAction::parse(&self.action)?;
        Some(DocumentHistoryEntry {
            id: self.id,
            document_id: DocumentId(self.document_id),
            action,
            field: self.field.as_deref().and_then(MetadataFieldName::parse),
            old_value: self.old_value,
            new_value: self.new_value,
            actor: self.actor,
            created_at: self.created_at,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Row to append to a document's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub action: HistoryAction,
    pub field: Option<MetadataFieldName>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl NewHistoryEntry {
    pub fn action(action: HistoryAction) -> Self {
        Self {
            action,
            field: None,
            old_value: None,
            new_value: None,
        }
    }
}

pub async fn insert_many<C: ConnectionTrait>(
    db: &C,
    document_id: DocumentId,
    actor: &str,
    entries: &[NewHistoryEntry],
) -> anyhow::Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let now = Utc::now();
    let models = entries.iter().map(|e| ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        document_id: Set(document_id.value()),
        action: Set(e.action.as_str().to_string()),
        field: Set(e.field.map(|f| f.as_str().to_string())),
        old_value: Set(e.old_value.clone()),
        new_value: Set(e.new_value.clone()),
        actor: Set(actor.to_string()),
        created_at: Set(now),
    });
    Entity::insert_many(models).exec(db).await?;
    Ok(())
}

/// Newest first
pub async fn list_by_document(document_id: DocumentId) -> anyhow::Result<Vec<DocumentHistoryEntry>> {
    let rows = Entity::find()
        .filter(Column::DocumentId.eq(document_id.value()))
        .order_by_desc(Column::Id)
        .all(conn())
        .await?;
    Ok(rows.into_iter().filter_map(Model::into_entry).collect())
}
