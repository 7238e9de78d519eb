//! Reference data behind a document's metadata links
//!
//! Documents store identifiers only. Display values (policy number, loss
//! label, assignee name...) are resolved through [`ReferenceLookup`] on every
//! read, and every write is checked against it first.

use async_trait::async_trait;
use contracts::domain::a001_document::aggregate::UpdateMetadataRequest;
use contracts::domain::a001_document::metadata::{AssigneeType, DocumentMetadata};
use contracts::domain::a002_policy::aggregate::Policy;
use contracts::domain::a003_loss::aggregate::Loss;
use contracts::domain::a004_claimant::aggregate::Claimant;
use contracts::domain::a005_producer::aggregate::Producer;
use contracts::system::users::{Group, User};

use super::error::{DocumentError, RelationshipError};
use crate::domain::{a002_policy, a003_loss, a004_claimant, a005_producer};
use crate::system::users::repository as users;

#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn policy(&self, id: i64) -> anyhow::Result<Option<Policy>>;
    async fn loss(&self, id: i64) -> anyhow::Result<Option<Loss>>;
    async fn claimant(&self, id: i64) -> anyhow::Result<Option<Claimant>>;
    async fn producer(&self, id: i64) -> anyhow::Result<Option<Producer>>;
    async fn user(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn group(&self, id: i64) -> anyhow::Result<Option<Group>>;
}

/// Lookup over the SQLite reference tables
pub struct DbReferences;

#[async_trait]
impl ReferenceLookup for DbReferences {
    async fn policy(&self, id: i64) -> anyhow::Result<Option<Policy>> {
        a002_policy::repository::get_by_id(id).await
    }

    async fn loss(&self, id: i64) -> anyhow::Result<Option<Loss>> {
        a003_loss::repository::get_by_id(id).await
    }

    async fn claimant(&self, id: i64) -> anyhow::Result<Option<Claimant>> {
        a004_claimant::repository::get_by_id(id).await
    }

    async fn producer(&self, id: i64) -> anyhow::Result<Option<Producer>> {
        a005_producer::repository::get_by_id(id).await
    }

    async fn user(&self, id: i64) -> anyhow::Result<Option<User>> {
        users::get_user(id).await
    }

    async fn group(&self, id: i64) -> anyhow::Result<Option<Group>> {
        users::get_group(id).await
    }
}

/// Trimmed description, `None` when blank
pub fn normalize_description(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Display name of an assignee, `None` when the record is gone
async fn assignee_label(
    refs: &dyn ReferenceLookup,
    id: i64,
    kind: AssigneeType,
) -> anyhow::Result<Option<String>> {
    Ok(match kind {
        AssigneeType::User => refs.user(id).await?.map(|u| u.display_name().to_string()),
        AssigneeType::Group => refs.group(id).await?.map(|g| g.name),
    })
}

/// Stored links → metadata with display values.
///
/// Tolerant: a link whose record no longer exists keeps its identifier and
/// gets no display value.
pub async fn resolve_metadata(
    links: &UpdateMetadataRequest,
    refs: &dyn ReferenceLookup,
) -> anyhow::Result<DocumentMetadata> {
    let mut metadata = DocumentMetadata {
        policy_id: links.policy_id,
        loss_id: links.loss_id,
        claimant_id: links.claimant_id,
        producer_id: links.producer_id,
        document_description: links.document_description.clone(),
        assigned_to_id: links.assigned_to_id,
        assigned_to_type: links.assigned_to_type,
        ..Default::default()
    };
    if let Some(id) = links.policy_id {
        metadata.policy_number = refs.policy(id).await?.map(|p| p.policy_number);
    }
    if let Some(id) = links.loss_id {
        metadata.loss_sequence = refs.loss(id).await?.map(|l| l.label());
    }
    if let Some(id) = links.claimant_id {
        metadata.claimant = refs.claimant(id).await?.map(|c| c.label());
    }
    if let Some(id) = links.producer_id {
        metadata.producer_number = refs.producer(id).await?.map(|p| p.producer_number);
    }
    if let (Some(id), Some(kind)) = (links.assigned_to_id, links.assigned_to_type) {
        metadata.assigned_to = assignee_label(refs, id, kind).await?;
    }
    Ok(metadata)
}

/// Check an update against the reference data and build the resulting
/// metadata.
///
/// Structural problems (a child without its parent, half an assignment) are
/// reported before any lookup.
pub async fn validate_relationships(
    request: &UpdateMetadataRequest,
    refs: &dyn ReferenceLookup,
) -> Result<DocumentMetadata, DocumentError> {
    if request.loss_id.is_some() && request.policy_id.is_none() {
        return Err(RelationshipError::LossWithoutPolicy.into());
    }
    if request.claimant_id.is_some() && request.loss_id.is_none() {
        return Err(RelationshipError::ClaimantWithoutLoss.into());
    }
    if request.assigned_to_id.is_some() != request.assigned_to_type.is_some() {
        return Err(RelationshipError::AssignmentConflict(
            "assigned_to_id and assigned_to_type must be set together".into(),
        )
        .into());
    }

    let mut metadata = DocumentMetadata {
        document_description: normalize_description(request.document_description.as_deref()),
        ..Default::default()
    };

    if let Some(policy_id) = request.policy_id {
        let policy = refs
            .policy(policy_id)
            .await?
            .ok_or(RelationshipError::UnknownPolicy(policy_id))?;
        metadata.policy_id = Some(policy.id);
        metadata.policy_number = Some(policy.policy_number);
    }

    if let Some(loss_id) = request.loss_id {
        let policy_id = metadata.policy_id.ok_or(RelationshipError::LossWithoutPolicy)?;
        let loss = refs
            .loss(loss_id)
            .await?
            .ok_or(RelationshipError::UnknownLoss(loss_id))?;
        if loss.policy_id != policy_id {
            return Err(RelationshipError::LossNotInPolicy { loss_id, policy_id }.into());
        }
        metadata.loss_id = Some(loss.id);
        metadata.loss_sequence = Some(loss.label());
    }

    if let Some(claimant_id) = request.claimant_id {
        let loss_id = metadata.loss_id.ok_or(RelationshipError::ClaimantWithoutLoss)?;
        let claimant = refs
            .claimant(claimant_id)
            .await?
            .ok_or(RelationshipError::UnknownClaimant(claimant_id))?;
        if claimant.loss_id != loss_id {
            return Err(RelationshipError::ClaimantNotInLoss {
                claimant_id,
                loss_id,
            }
            .into());
        }
        metadata.claimant_id = Some(claimant.id);
        metadata.claimant = Some(claimant.label());
    }

    if let Some(producer_id) = request.producer_id {
        let producer = refs
            .producer(producer_id)
            .await?
            .ok_or(RelationshipError::UnknownProducer(producer_id))?;
        metadata.producer_id = Some(producer.id);
        metadata.producer_number = Some(producer.producer_number);
    }

    if let (Some(id), Some(kind)) = (request.assigned_to_id, request.assigned_to_type) {
        let label = match kind {
            AssigneeType::User => {
                let user = refs.user(id).await?.ok_or_else(|| {
                    RelationshipError::AssignmentConflict(format!("User {} does not exist", id))
                })?;
                if !user.is_active {
                    return Err(RelationshipError::AssignmentConflict(format!(
                        "User {} is inactive",
                        user.username
                    ))
                    .into());
                }
                user.display_name().to_string()
            }
            AssigneeType::Group => {
                refs.group(id)
                    .await?
                    .ok_or_else(|| {
                        RelationshipError::AssignmentConflict(format!("Group {} does not exist", id))
                    })?
                    .name
            }
        };
        metadata.assigned_to_id = Some(id);
        metadata.assigned_to_type = Some(kind);
        metadata.assigned_to = Some(label);
    }

    Ok(metadata)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory reference data
    #[derive(Default)]
    pub(crate) struct FakeReferences {
        pub policies: HashMap<i64, Policy>,
        pub losses: HashMap<i64, Loss>,
        pub claimants: HashMap<i64, Claimant>,
        pub producers: HashMap<i64, Producer>,
        pub users: HashMap<i64, User>,
        pub groups: HashMap<i64, Group>,
    }

    #[async_trait]
    impl ReferenceLookup for FakeReferences {
        async fn policy(&self, id: i64) -> anyhow::Result<Option<Policy>> {
            Ok(self.policies.get(&id).cloned())
        }
        async fn loss(&self, id: i64) -> anyhow::Result<Option<Loss>> {
            Ok(self.losses.get(&id).cloned())
        }
        async fn claimant(&self, id: i64) -> anyhow::Result<Option<Claimant>> {
            Ok(self.claimants.get(&id).cloned())
        }
        async fn producer(&self, id: i64) -> anyhow::Result<Option<Producer>> {
            Ok(self.producers.get(&id).cloned())
        }
        async fn user(&self, id: i64) -> anyhow::Result<Option<User>> {
            Ok(self.users.get(&id).cloned())
        }
        async fn group(&self, id: i64) -> anyhow::Result<Option<Group>> {
            Ok(self.groups.get(&id).cloned())
        }
    }

    /// Two policies, each with one loss and one claimant; one producer,
    /// an active and an inactive user, one group
    pub(crate) fn sample_references() -> FakeReferences {
        let mut refs = FakeReferences::default();
        for (id, number) in [(1, "PLCY-1001"), (2, "PLCY-1002")] {
            refs.policies.insert(
                id,
                Policy {
                    id,
                    policy_number: number.into(),
                    insured_name: "Acme".into(),
                    producer_id: Some(7),
                },
            );
            refs.losses.insert(
                10 + id,
                Loss {
                    id: 10 + id,
                    policy_id: id,
                    sequence: 1,
                    description: "Vehicle Accident".into(),
                },
            );
            refs.claimants.insert(
                20 + id,
                Claimant {
                    id: 20 + id,
                    loss_id: 10 + id,
                    sequence: 1,
                    name: "John Doe".into(),
                },
            );
        }
        refs.producers.insert(
            7,
            Producer {
                id: 7,
                producer_number: "AG-789456".into(),
                name: "Best Brokers".into(),
            },
        );
        refs.users.insert(
            3,
            User {
                id: 3,
                username: "jadjuster".into(),
                full_name: Some("Jane Adjuster".into()),
                is_active: true,
            },
        );
        refs.users.insert(
            4,
            User {
                id: 4,
                username: "retired".into(),
                full_name: None,
                is_active: false,
            },
        );
        refs.groups.insert(
            5,
            Group {
                id: 5,
                name: "Claims Team".into(),
            },
        );
        refs
    }

    fn relationship_code(result: Result<DocumentMetadata, DocumentError>) -> &'static str {
        match result {
            Err(DocumentError::Relationship(e)) => e.code(),
            other => panic!("expected relationship error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_chain_resolves_labels() {
        let refs = sample_references();
        let request = UpdateMetadataRequest {
            policy_id: Some(1),
            loss_id: Some(11),
            claimant_id: Some(21),
            producer_id: Some(7),
            document_description: Some("  Police report ".into()),
            assigned_to_id: Some(5),
            assigned_to_type: Some(AssigneeType::Group),
        };
        let metadata = validate_relationships(&request, &refs).await.unwrap();
        assert_eq!(metadata.policy_number.as_deref(), Some("PLCY-1001"));
        assert_eq!(metadata.loss_sequence.as_deref(), Some("1 - Vehicle Accident"));
        assert_eq!(metadata.claimant.as_deref(), Some("1 - John Doe"));
        assert_eq!(metadata.producer_number.as_deref(), Some("AG-789456"));
        assert_eq!(metadata.document_description.as_deref(), Some("Police report"));
        assert_eq!(metadata.assigned_to.as_deref(), Some("Claims Team"));
        assert_eq!(metadata.assigned_to_type, Some(AssigneeType::Group));
    }

    #[tokio::test]
    async fn test_loss_of_another_policy_is_rejected() {
        let refs = sample_references();
        let request = UpdateMetadataRequest {
            policy_id: Some(1),
            loss_id: Some(12),
            ..Default::default()
        };
        let result = validate_relationships(&request, &refs).await;
        assert_eq!(relationship_code(result), "LOSS_NOT_IN_POLICY");
    }

    #[tokio::test]
    async fn test_claimant_of_another_loss_is_rejected() {
        let refs = sample_references();
        let request = UpdateMetadataRequest {
            policy_id: Some(1),
            loss_id: Some(11),
            claimant_id: Some(22),
            ..Default::default()
        };
        let result = validate_relationships(&request, &refs).await;
        assert_eq!(relationship_code(result), "CLAIMANT_NOT_IN_LOSS");
    }

    #[tokio::test]
    async fn test_child_without_parent_is_rejected() {
        let refs = sample_references();
        let loss_only = UpdateMetadataRequest {
            loss_id: Some(11),
            ..Default::default()
        };
        assert_eq!(
            relationship_code(validate_relationships(&loss_only, &refs).await),
            "LOSS_WITHOUT_POLICY"
        );

        let claimant_only = UpdateMetadataRequest {
            policy_id: Some(1),
            claimant_id: Some(21),
            ..Default::default()
        };
        assert_eq!(
            relationship_code(validate_relationships(&claimant_only, &refs).await),
            "CLAIMANT_WITHOUT_LOSS"
        );
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected() {
        let refs = sample_references();
        let cases = [
            (
                UpdateMetadataRequest {
                    policy_id: Some(99),
                    ..Default::default()
                },
                "UNKNOWN_POLICY",
            ),
            (
                UpdateMetadataRequest {
                    policy_id: Some(1),
                    loss_id: Some(99),
                    ..Default::default()
                },
                "UNKNOWN_LOSS",
            ),
            (
                UpdateMetadataRequest {
                    policy_id: Some(1),
                    loss_id: Some(11),
                    claimant_id: Some(99),
                    ..Default::default()
                },
                "UNKNOWN_CLAIMANT",
            ),
            (
                UpdateMetadataRequest {
                    producer_id: Some(99),
                    ..Default::default()
                },
                "UNKNOWN_PRODUCER",
            ),
        ];
        for (request, code) in cases {
            assert_eq!(
                relationship_code(validate_relationships(&request, &refs).await),
                code
            );
        }
    }

    #[tokio::test]
    async fn test_assignment_rules() {
        let refs = sample_references();
        let half = UpdateMetadataRequest {
            assigned_to_id: Some(3),
            ..Default::default()
        };
        assert_eq!(
            relationship_code(validate_relationships(&half, &refs).await),
            "ASSIGNMENT_CONFLICT"
        );

        // group id used as a user id
        let wrong_kind = UpdateMetadataRequest {
            assigned_to_id: Some(5),
            assigned_to_type: Some(AssigneeType::User),
            ..Default::default()
        };
        assert_eq!(
            relationship_code(validate_relationships(&wrong_kind, &refs).await),
            "ASSIGNMENT_CONFLICT"
        );

        let inactive = UpdateMetadataRequest {
            assigned_to_id: Some(4),
            assigned_to_type: Some(AssigneeType::User),
            ..Default::default()
        };
        assert_eq!(
            relationship_code(validate_relationships(&inactive, &refs).await),
            "ASSIGNMENT_CONFLICT"
        );

        let user = UpdateMetadataRequest {
            assigned_to_id: Some(3),
            assigned_to_type: Some(AssigneeType::User),
            ..Default::default()
        };
        let metadata = validate_relationships(&user, &refs).await.unwrap();
        assert_eq!(metadata.assigned_to.as_deref(), Some("Jane Adjuster"));
    }

    #[tokio::test]
    async fn test_empty_request_clears_everything() {
        let refs = sample_references();
        let request = UpdateMetadataRequest {
            document_description: Some("   ".into()),
            ..Default::default()
        };
        let metadata = validate_relationships(&request, &refs).await.unwrap();
        assert_eq!(metadata, DocumentMetadata::default());
    }

    #[tokio::test]
    async fn test_resolve_tolerates_missing_records() {
        let refs = sample_references();
        let links = UpdateMetadataRequest {
            policy_id: Some(2),
            loss_id: Some(404),
            assigned_to_id: Some(3),
            assigned_to_type: Some(AssigneeType::User),
            ..Default::default()
        };
        let metadata = resolve_metadata(&links, &refs).await.unwrap();
        assert_eq!(metadata.policy_number.as_deref(), Some("PLCY-1002"));
        assert_eq!(metadata.loss_id, Some(404));
        assert_eq!(metadata.loss_sequence, None);
        assert_eq!(metadata.assigned_to.as_deref(), Some("Jane Adjuster"));
    }
}
