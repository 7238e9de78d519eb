use serde::{Deserialize, Serialize};

use crate::domain::a001_document::options::MetadataOption;

/// Агент / продюсер
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub id: i64,
    /// Номер агента, например "AG-789456"
    pub producer_number: String,
    pub name: String,
}

impl Producer {
    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::new(self.id, self.producer_number.clone())
    }
}
