//! Claim document aggregate and its cascading metadata form rules
//!
//! - metadata.rs: field identifiers and the metadata value object
//! - field_config.rs: static field table and dependency edges
//! - dependency.rs: disabling and cascade traversal
//! - validation.rs: field validators and the form aggregator
//! - mapping.rs: form ↔ API conversions
//! - options.rs: lookup options and their scoping context
//! - history.rs: audit entries and metadata diffing

pub mod aggregate;
pub mod dependency;
pub mod field_config;
pub mod history;
pub mod mapping;
pub mod metadata;
pub mod options;
pub mod validation;
