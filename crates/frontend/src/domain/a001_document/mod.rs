//! Documents view: list, details with PDF viewer, cascading metadata form

pub mod model;
pub mod ui;
