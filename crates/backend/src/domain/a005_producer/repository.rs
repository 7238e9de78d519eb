use contracts::domain::a005_producer::aggregate::Producer;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, PaginatorTrait, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a005_producer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub producer_number: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Producer {
    fn from(m: Model) -> Self {
        Producer {
            id: m.id,
            producer_number: m.producer_number,
            name: m.name,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Producer>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Producers whose number or name contains `query`
pub async fn search(query: Option<&str>, limit: u64) -> anyhow::Result<Vec<Producer>> {
    let mut select = Entity::find();
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(Column::ProducerNumber.contains(q))
                .add(Column::Name.contains(q)),
        );
    }
    let items = select
        .order_by_asc(Column::ProducerNumber)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(producer_number: &str, name: &str) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        producer_number: Set(producer_number.to_string()),
        name: Set(name.to_string()),
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}
