use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authentication identity, distinct from the Patient/Doctor
/// records it may own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    /// `pbkdf2_sha256$<iterations>$<salt b64>$<digest b64>`
    pub password_hash: String,
    pub email: Option<String>,
    /// Relative path of the uploaded profile picture under the media dir.
    pub image_path: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
