use serde::{Deserialize, Serialize};

use crate::domain::a001_document::options::MetadataOption;

/// Страховой полис (справочник, ведётся внешней системой)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: i64,
    /// Номер полиса, например "PLCY-12345"
    pub policy_number: String,
    pub insured_name: String,
    pub producer_id: Option<i64>,
}

impl Policy {
    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::new(self.id, self.policy_number.clone())
    }
}
