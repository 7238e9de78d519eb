use serde::{Deserialize, Serialize};

use crate::domain::a001_document::options::MetadataOption;

/// Убыток по полису
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loss {
    pub id: i64,
    pub policy_id: i64,
    /// Порядковый номер убытка внутри полиса
    pub sequence: i32,
    pub description: String,
}

impl Loss {
    /// Отображение в форме: "1 - Vehicle Accident"
    pub fn label(&self) -> String {
        format!("{} - {}", self.sequence, self.description)
    }

    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::new(self.id, self.label())
    }
}
