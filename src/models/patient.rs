use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient record managed through the entity CRUD pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub username: String,
    /// Owning account, when one with a matching username exists.
    pub account_id: Option<Uuid>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_first_and_last() {
        let p = Patient {
            id: Uuid::new_v4(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone_number: "0700000001".into(),
            email: "jane@example.com".into(),
            username: "janedoe".into(),
            account_id: None,
        };
        assert_eq!(p.full_name(), "Jane Doe");
    }
}
