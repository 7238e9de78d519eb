//! Common types and traits for all aggregates

pub mod entity_metadata;
pub mod aggregate_root;

// Re-exports
pub use entity_metadata::EntityMetadata;
pub use aggregate_root::AggregateRoot;
