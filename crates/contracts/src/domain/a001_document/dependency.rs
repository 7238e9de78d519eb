//! Dependency resolution between metadata fields

use std::collections::VecDeque;

use super::field_config::{self, FieldDependency};
use super::metadata::{DocumentMetadata, MetadataFieldName};

/// Dependency edge of `field`, `None` for root fields
pub fn get_field_dependency(field: MetadataFieldName) -> Option<&'static FieldDependency> {
    field_config::get_dependency(field)
}

/// A dependent field is disabled until its parent holds an identifier
pub fn should_disable_field(field: MetadataFieldName, metadata: &DocumentMetadata) -> bool {
    match get_field_dependency(field) {
        Some(dep) => !metadata.has_value_at(dep.parent_value_path),
        None => false,
    }
}

/// Read-only documents disable every field
pub fn is_field_disabled(field: MetadataFieldName, metadata: &DocumentMetadata, read_only: bool) -> bool {
    read_only || should_disable_field(field, metadata)
}

/// All transitive dependents of `field`, parents before children, each once.
///
/// Breadth-first over the declared edge list, so the result does not depend on
/// how the UI walks its components.
pub fn cascade_order(field: MetadataFieldName) -> Vec<MetadataFieldName> {
    let mut order = Vec::new();
    let mut queue = VecDeque::from([field]);

    while let Some(current) = queue.pop_front() {
        for child in field_config::dependents_of(current) {
            if child != field && !order.contains(&child) {
                order.push(child);
                queue.push_back(child);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_policy() -> DocumentMetadata {
        DocumentMetadata {
            policy_number: Some("PLCY-1".into()),
            policy_id: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_root_fields_never_disabled() {
        let empty = DocumentMetadata::default();
        for field in MetadataFieldName::ALL {
            if get_field_dependency(field).is_none() {
                assert!(!should_disable_field(field, &empty), "{field}");
                assert!(!should_disable_field(field, &with_policy()), "{field}");
            }
        }
    }

    #[test]
    fn test_dependent_disabled_iff_parent_id_missing() {
        let empty = DocumentMetadata::default();
        assert!(should_disable_field(MetadataFieldName::LossSequence, &empty));
        assert!(!should_disable_field(MetadataFieldName::LossSequence, &with_policy()));

        // display text alone does not unlock the child
        let text_only = DocumentMetadata {
            policy_number: Some("PLCY-1".into()),
            ..Default::default()
        };
        assert!(should_disable_field(MetadataFieldName::LossSequence, &text_only));

        let mut with_loss = with_policy();
        assert!(should_disable_field(MetadataFieldName::Claimant, &with_loss));
        with_loss.loss_id = Some(0);
        assert!(!should_disable_field(MetadataFieldName::Claimant, &with_loss));
    }

    #[test]
    fn test_read_only_disables_everything() {
        let m = with_policy();
        for field in MetadataFieldName::ALL {
            assert!(is_field_disabled(field, &m, true));
        }
        assert!(!is_field_disabled(MetadataFieldName::PolicyNumber, &m, false));
    }

    #[test]
    fn test_cascade_order_is_transitive() {
        assert_eq!(
            cascade_order(MetadataFieldName::PolicyNumber),
            vec![MetadataFieldName::LossSequence, MetadataFieldName::Claimant]
        );
        assert_eq!(
            cascade_order(MetadataFieldName::LossSequence),
            vec![MetadataFieldName::Claimant]
        );
        assert!(cascade_order(MetadataFieldName::Claimant).is_empty());
        assert!(cascade_order(MetadataFieldName::ProducerNumber).is_empty());
    }
}
