use thiserror::Error;

use crate::db::DatabaseError;

/// Service-level failure taxonomy.
///
/// Everything the service layer can refuse or fail on, kept distinct so
/// a host can map each kind to its own dialog/exit path. Data-access
/// failures stay their own variant — they must never be collapsed into
/// an empty result.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Business(String),

    #[error("{0}")]
    Authentication(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn business(reason: impl Into<String>) -> Self {
        Self::Business(reason.into())
    }
}
