//! Document details: PDF viewer, metadata form, status actions, history
//!
//! - view_model.rs: ViewModel with commands and state management
//! - view.rs: Leptos component (pure UI)

mod view;
mod view_model;

pub use view::DocumentDetails;
pub use view_model::DocumentDetailsViewModel;
