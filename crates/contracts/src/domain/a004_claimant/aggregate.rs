use serde::{Deserialize, Serialize};

use crate::domain::a001_document::options::MetadataOption;

/// Заявитель по убытку
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimant {
    pub id: i64,
    pub loss_id: i64,
    /// Порядковый номер заявителя внутри убытка
    pub sequence: i32,
    pub name: String,
}

impl Claimant {
    /// Отображение в форме: "1 - John Doe"
    pub fn label(&self) -> String {
        format!("{} - {}", self.sequence, self.name)
    }

    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::new(self.id, self.label())
    }
}
