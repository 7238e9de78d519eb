pub mod details;
pub mod list;
pub mod metadata_form;
