//! Row decoding helpers shared by the repository modules.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

pub(crate) fn parse_uuid(column: &'static str, value: String) -> ServiceResult<Uuid> {
    Uuid::parse_str(&value).map_err(|_| ServiceError::Corrupt { column, value })
}

pub(crate) fn parse_timestamp(
    column: &'static str,
    value: String,
) -> ServiceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ServiceError::Corrupt { column, value })
}

/// Wraps a user-supplied search term for a substring `LIKE` match.
pub(crate) fn like_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_rejects_garbage() {
        assert!(parse_uuid("category_id", "not-a-uuid".into()).is_err());
    }

    #[test]
    fn parse_timestamp_round_trips_utc() {
        let now = Utc::now();
        let parsed = parse_timestamp("created_at", now.to_rfc3339()).unwrap();
        assert_eq!(parsed, now);
    }
}
