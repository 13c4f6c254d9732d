//! Time and timestamp helpers.
//!
//! Timestamps travel as RFC 3339 strings on the wire and in storage.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `updated_at`, `created_at`, `recorded_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string (any offset) into a UTC [`Timestamp`].
///
/// # Errors
///
/// Returns the chrono parse error when `value` is not valid RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.to_utc())
}
