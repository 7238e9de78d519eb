//! Option lists for the metadata form's lookup fields

use contracts::domain::a001_document::metadata::MetadataFieldName;
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};
use contracts::domain::a001_document::validation::FieldError;
use thiserror::Error;

use crate::domain::{a002_policy, a003_loss, a004_claimant, a005_producer};
use crate::system::users::repository as users;

/// Upper bound of one option list
pub const OPTIONS_LIMIT: u64 = 50;

#[derive(Debug, Error)]
pub enum OptionsError {
    /// Parent identifier needed to scope the list is missing
    #[error("{0}")]
    MissingParent(FieldError),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Check that the context carries the parent a gated field is listed by
pub fn check_scope(field: MetadataFieldName, ctx: &OptionsContext) -> Result<(), FieldError> {
    match field {
        MetadataFieldName::LossSequence if ctx.policy_id.is_none() => {
            Err(FieldError::PolicyRequiredForLoss)
        }
        MetadataFieldName::Claimant if ctx.loss_id.is_none() => {
            Err(FieldError::LossRequiredForClaimant)
        }
        _ => Ok(()),
    }
}

/// Users first, then groups, capped at `limit` together
fn merge_assignees(
    mut users: Vec<MetadataOption>,
    groups: Vec<MetadataOption>,
    limit: u64,
) -> Vec<MetadataOption> {
    users.extend(groups);
    users.truncate(limit as usize);
    users
}

pub async fn list_options(
    field: MetadataFieldName,
    ctx: &OptionsContext,
) -> Result<Vec<MetadataOption>, OptionsError> {
    check_scope(field, ctx).map_err(OptionsError::MissingParent)?;
    let query = ctx.query.as_deref();

    let options: Vec<MetadataOption> = match field {
        MetadataFieldName::PolicyNumber => {
            a002_policy::repository::search(ctx.producer_id, query, OPTIONS_LIMIT)
                .await?
                .iter()
                .map(|p| p.to_option())
                .collect()
        }
        MetadataFieldName::LossSequence => {
            let policy_id = ctx
                .policy_id
                .ok_or(OptionsError::MissingParent(FieldError::PolicyRequiredForLoss))?;
            a003_loss::repository::list_by_policy(policy_id, query, OPTIONS_LIMIT)
                .await?
                .iter()
                .map(|l| l.to_option())
                .collect()
        }
        MetadataFieldName::Claimant => {
            let loss_id = ctx
                .loss_id
                .ok_or(OptionsError::MissingParent(FieldError::LossRequiredForClaimant))?;
            a004_claimant::repository::list_by_loss(loss_id, query, OPTIONS_LIMIT)
                .await?
                .iter()
                .map(|c| c.to_option())
                .collect()
        }
        MetadataFieldName::ProducerNumber => a005_producer::repository::search(query, OPTIONS_LIMIT)
            .await?
            .iter()
            .map(|p| p.to_option())
            .collect(),
        MetadataFieldName::AssignedTo => {
            let user_options = users::search_active_users(query, OPTIONS_LIMIT)
                .await?
                .iter()
                .map(|u| u.to_option())
                .collect();
            let group_options = users::search_groups(query, OPTIONS_LIMIT)
                .await?
                .iter()
                .map(|g| g.to_option())
                .collect();
            merge_assignees(user_options, group_options, OPTIONS_LIMIT)
        }
        MetadataFieldName::DocumentDescription => Vec::new(),
    };

    tracing::debug!("{} options for {}", options.len(), field);
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_document::metadata::AssigneeType;

    #[test]
    fn test_gated_fields_need_their_parent() {
        let empty = OptionsContext::default();
        assert_eq!(
            check_scope(MetadataFieldName::LossSequence, &empty),
            Err(FieldError::PolicyRequiredForLoss)
        );
        assert_eq!(
            check_scope(MetadataFieldName::Claimant, &empty),
            Err(FieldError::LossRequiredForClaimant)
        );
        assert_eq!(check_scope(MetadataFieldName::PolicyNumber, &empty), Ok(()));
        assert_eq!(check_scope(MetadataFieldName::AssignedTo, &empty), Ok(()));

        // identifier 0 is a real parent
        let scoped = OptionsContext {
            policy_id: Some(0),
            ..Default::default()
        };
        assert_eq!(check_scope(MetadataFieldName::LossSequence, &scoped), Ok(()));
    }

    #[test]
    fn test_assignees_merge_users_before_groups() {
        let users = vec![MetadataOption::assignee(1, "Jane", AssigneeType::User)];
        let groups = vec![
            MetadataOption::assignee(1, "Claims Team", AssigneeType::Group),
            MetadataOption::assignee(2, "Fraud Unit", AssigneeType::Group),
        ];
        let merged = merge_assignees(users, groups, 2);
        let values: Vec<_> = merged.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["user:1", "group:1"]);
    }
}
