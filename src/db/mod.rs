pub mod schema;
pub mod document_repo;
pub mod user_repo;
pub mod lead_repo;
pub mod appointment_repo;
pub mod activity_repo;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{CrmError, CrmResult};

/// Timestamps are stored as RFC 3339 text in UTC.
pub(crate) fn to_db_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn from_db_time(s: &str) -> CrmResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CrmError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}
