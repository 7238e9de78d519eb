use contracts::domain::a002_policy::aggregate::Policy;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, QueryOrder, QuerySelect, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_policy")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub policy_number: String,
    pub insured_name: String,
    pub producer_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Policy {
    fn from(m: Model) -> Self {
        Policy {
            id: m.id,
            policy_number: m.policy_number,
            insured_name: m.insured_name,
            producer_id: m.producer_id,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Policy>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Policies matching `query` by number or insured name, optionally limited to one producer
pub async fn search(
    producer_id: Option<i64>,
    query: Option<&str>,
    limit: u64,
) -> anyhow::Result<Vec<Policy>> {
    let mut select = Entity::find();
    if let Some(producer_id) = producer_id {
        select = select.filter(Column::ProducerId.eq(producer_id));
    }
    if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(Column::PolicyNumber.contains(q))
                .add(Column::InsuredName.contains(q)),
        );
    }
    let items = select
        .order_by_asc(Column::PolicyNumber)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert(
    policy_number: &str,
    insured_name: &str,
    producer_id: Option<i64>,
) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        policy_number: Set(policy_number.to_string()),
        insured_name: Set(insured_name.to_string()),
        producer_id: Set(producer_id),
    };
    let model = active.insert(conn()).await?;
    Ok(model.id)
}
