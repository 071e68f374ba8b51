use serde::{Deserialize, Serialize};

/// Consultation category (e.g. routine visit, urgent care).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub designation: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(designation: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: 0,
            designation: designation.into(),
            description,
        }
    }
}
