//! Cascading metadata form
//!
//! - cascade.rs: option lists, dependent clearing, latest-request-wins tokens
//! - collaborators.rs: options/save seams and their HTTP implementation
//! - form_state.rs: controller (values, errors, touched, autosave, submit)
//! - view.rs: Leptos component (pure UI)

pub mod cascade;
pub mod collaborators;
pub mod form_state;
mod view;

pub use collaborators::HttpMetadataApi;
pub use form_state::{AutosaveOutcome, ChangeEffects, MetadataFormController, MetadataFormState};
pub use view::MetadataForm;
