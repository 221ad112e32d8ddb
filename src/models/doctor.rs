use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor record. Same shape as Patient, semantically a distinct
/// entity set with its own table and pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub username: String,
    /// Owning account, when one with a matching username exists.
    pub account_id: Option<Uuid>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
