//! Repository layer — entity-scoped database operations.
//!
//! Free functions over an explicit `&Connection`, one sub-module per
//! entity. All public functions are re-exported here.

mod category;
mod consultation;
mod patient;
mod user;

pub use category::*;
pub use consultation::*;
pub use patient::*;
pub use user::*;

use chrono::NaiveDateTime;

use super::DatabaseError;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn encode_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn decode_datetime(
    column: &'static str,
    value: &str,
) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| {
        DatabaseError::MalformedValue {
            column,
            value: value.into(),
        }
    })
}

/// `created_at` is filled in by SQLite; absent or unparseable values
/// read as `None`.
pub(crate) fn decode_created_at(value: Option<String>) -> Option<NaiveDateTime> {
    value.and_then(|s| NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).ok())
}
