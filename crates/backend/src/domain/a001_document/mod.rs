pub mod error;
pub mod history_repository;
pub mod options;
pub mod references;
pub mod repository;
pub mod service;
