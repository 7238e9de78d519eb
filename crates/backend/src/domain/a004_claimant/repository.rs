use contracts::domain::a004_claimant::aggregate::Claimant;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_claimant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub loss_id: i64,
    pub sequence: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Claimant {
    fn from(m: Model) -> Self {
        Claimant {
            id: m.id,
            loss_id: m.loss_id,
            sequence: m.sequence,
            name: m.name,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Claimant>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn list_by_loss(
    loss_id: i64,
    query: Option<&str>,
    limit: u64,
) -> anyhow::Result<Vec<Claimant>> {
    let mut select = Entity::find().filter(Column::LossId.eq(loss_id));
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        select = select.filter(Column::Name.contains(q));
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

pub async fn insert(loss_id: i64, sequence: i32, name: &str) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        loss_id: Set(loss_id),
        sequence: Set(sequence),
        name: Set(name.to_string()),
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}
