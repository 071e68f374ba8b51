use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// Clinic staff account — a doctor or an assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn is_doctor(&self) -> bool {
        self.role == UserRole::Doctor
    }

    pub fn is_assistant(&self) -> bool {
        self.role == UserRole::Assistant
    }
}
