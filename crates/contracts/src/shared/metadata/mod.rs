//! Metadata types for describing editable fields
//!
//! Field-level widget and validation descriptors shared by the form engine
//! (frontend) and request validation (backend). All values are `'static`
//! so field tables can live in `const` items.

mod field_type;
mod validation;

pub use field_type::FieldType;
pub use validation::ValidationRules;
