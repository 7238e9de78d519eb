pub mod common;

pub mod a001_document;
pub mod a002_policy;
pub mod a003_loss;
pub mod a004_claimant;
pub mod a005_producer;
