use contracts::domain::a001_document::aggregate::DocumentId;
use contracts::domain::a001_document::metadata::MetadataFieldName;
use thiserror::Error;

/// Metadata links that do not fit together or point at nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipError {
    #[error("Loss {loss_id} does not belong to policy {policy_id}")]
    LossNotInPolicy { loss_id: i64, policy_id: i64 },

    #[error("Claimant {claimant_id} does not belong to loss {loss_id}")]
    ClaimantNotInLoss { claimant_id: i64, loss_id: i64 },

    #[error("A loss cannot be set without a policy")]
    LossWithoutPolicy,

    #[error("A claimant cannot be set without a loss")]
    ClaimantWithoutLoss,

    #[error("{0}")]
    AssignmentConflict(String),

    #[error("Policy {0} does not exist")]
    UnknownPolicy(i64),

    #[error("Loss {0} does not exist")]
    UnknownLoss(i64),

    #[error("Claimant {0} does not exist")]
    UnknownClaimant(i64),

    #[error("Producer {0} does not exist")]
    UnknownProducer(i64),
}

impl RelationshipError {
    /// Machine-readable code returned next to the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::LossNotInPolicy { .. } => "LOSS_NOT_IN_POLICY",
            Self::ClaimantNotInLoss { .. } => "CLAIMANT_NOT_IN_LOSS",
            Self::LossWithoutPolicy => "LOSS_WITHOUT_POLICY",
            Self::ClaimantWithoutLoss => "CLAIMANT_WITHOUT_LOSS",
            Self::AssignmentConflict(_) => "ASSIGNMENT_CONFLICT",
            Self::UnknownPolicy(_) => "UNKNOWN_POLICY",
            Self::UnknownLoss(_) => "UNKNOWN_LOSS",
            Self::UnknownClaimant(_) => "UNKNOWN_CLAIMANT",
            Self::UnknownProducer(_) => "UNKNOWN_PRODUCER",
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document {0} not found")]
    NotFound(DocumentId),

    /// Operation not allowed in the document's current state
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    /// Free-text value breaking its field rules
    #[error("{message}")]
    InvalidField {
        field: MetadataFieldName,
        message: String,
    },

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}
