use contracts::domain::a003_loss::aggregate::Loss;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_loss")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub policy_id: i64,
    pub sequence: i32,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Loss {
    fn from(m: Model) -> Self {
        Loss {
            id: m.id,
            policy_id: m.policy_id,
            sequence: m.sequence,
            description: m.description,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Loss>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Losses of one policy in sequence order, filtered by description
pub async fn list_by_policy(
    policy_id: i64,
    query: Option<&str>,
    limit: u64,
) -> anyhow::Result<Vec<Loss>> {
    let mut select = Entity::find().filter(Column::PolicyId.eq(policy_id));
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        select = select.filter(Column::Description.contains(q));
    }
    let items = select
        .order_by_asc(Column::Sequence)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(policy_id: i64, sequence: i32, description: &str) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        policy_id: Set(policy_id),
        sequence: Set(sequence),
        description: Set(description.to_string()),
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}
