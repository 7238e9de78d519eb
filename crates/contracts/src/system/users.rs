use serde::{Deserialize, Serialize};

use crate::domain::a001_document::metadata::AssigneeType;
use crate::domain::a001_document::options::MetadataOption;

/// Пользователь (возможный исполнитель документа)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }

    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::assignee(self.id, self.display_name(), AssigneeType::User)
    }
}

/// Рабочая группа (очередь) исполнителей
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

impl Group {
    pub fn to_option(&self) -> MetadataOption {
        MetadataOption::assignee(self.id, self.name.clone(), AssigneeType::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = User {
            id: 1,
            username: "jdoe".into(),
            full_name: None,
            is_active: true,
        };
        assert_eq!(user.to_option().label, "jdoe");
        user.full_name = Some("Jane Doe".into());
        assert_eq!(user.to_option().label, "Jane Doe");
        assert_eq!(user.to_option().value, "user:1");
    }
}
