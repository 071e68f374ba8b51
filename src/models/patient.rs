use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Patient {
    /// A not-yet-persisted patient record (id assigned on insert).
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            phone: phone.into(),
            email,
            created_at: None,
        }
    }
}
