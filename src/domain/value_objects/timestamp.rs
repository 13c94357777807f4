//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type for representing points in time
//! with nanosecond precision. The storage format is RFC 3339 with all nine
//! fractional digits, so values survive a store round trip unchanged.
//!
//! # Examples
//!
//! ```
//! use chargeback_api::domain::value_objects::timestamp::Timestamp;
//!
//! let opened = Timestamp::parse_rfc3339("2024-01-15T10:30:00Z").unwrap();
//! let refreshed = Timestamp::now_after(&opened);
//!
//! assert!(refreshed.is_after(&opened));
//! ```

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp with nanosecond precision.
///
/// Wraps `chrono::DateTime<Utc>`.
///
/// # Invariants
///
/// - Always in UTC timezone
/// - Nanosecond precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses an RFC 3339 string, normalising any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns the chrono parse error if the text is not RFC 3339.
    ///
    /// # Examples
    ///
    /// ```
    /// use chargeback_api::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::parse_rfc3339("2024-01-15T10:30:00+02:00").unwrap();
    /// assert_eq!(ts.to_rfc3339_nanos(), "2024-01-15T08:30:00.000000000Z");
    /// ```
    pub fn parse_rfc3339(text: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(text).map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Adds seconds to the timestamp (negative values subtract).
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Returns the current time, or one nanosecond past `previous` if the
    /// clock has not moved beyond it.
    ///
    /// Used to refresh modification times so they always advance.
    #[must_use]
    pub fn now_after(previous: &Self) -> Self {
        let now = Self::now();
        if now.is_after(previous) {
            now
        } else {
            Self(previous.0 + Duration::nanoseconds(1))
        }
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Formats as RFC 3339 with nine fractional digits and a `Z` suffix.
    #[must_use]
    pub fn to_rfc3339_nanos(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(text: &str) -> Timestamp {
        Timestamp::parse_rfc3339(text).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn now_creates_current_time() {
            let before = Utc::now();
            let ts = Timestamp::now();
            let after = Utc::now();

            assert!(ts.0 >= before);
            assert!(ts.0 <= after);
        }

        #[test]
        fn parse_normalises_offset_to_utc() {
            assert_eq!(
                at("2024-01-15T12:30:00+02:00"),
                at("2024-01-15T10:30:00Z")
            );
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!(Timestamp::parse_rfc3339("15/01/2024").is_err());
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn now_after_past_value_is_now() {
            let past = at("1970-01-01T00:00:00Z");
            let before = Timestamp::now();
            let refreshed = Timestamp::now_after(&past);
            assert!(refreshed.is_after(&past));
            assert!(refreshed >= before);
        }

        #[test]
        fn now_after_future_value_still_advances() {
            let future = at("2999-01-01T00:00:00Z");
            let refreshed = Timestamp::now_after(&future);
            assert!(refreshed.is_after(&future));
            assert_eq!(refreshed.to_rfc3339_nanos(), "2999-01-01T00:00:00.000000001Z");
        }

        #[test]
        fn add_secs_moves_both_ways() {
            let ts = at("2024-01-15T10:30:00Z");
            assert_eq!(ts.add_secs(60), at("2024-01-15T10:31:00Z"));
            assert_eq!(ts.add_secs(-60), at("2024-01-15T10:29:00Z"));
        }

        #[test]
        fn is_after_is_strict() {
            let ts = at("2024-01-15T10:30:00Z");
            assert!(!ts.is_after(&ts));
            assert!(at("2024-01-15T10:30:01Z").is_after(&ts));
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn rfc3339_nanos_round_trip() {
            let ts = at("2024-01-01T00:00:00.000000007Z");
            let text = ts.to_rfc3339_nanos();
            assert_eq!(text, "2024-01-01T00:00:00.000000007Z");
            assert_eq!(Timestamp::parse_rfc3339(&text).unwrap(), ts);
        }

        #[test]
        fn nanos_format_pads_whole_seconds() {
            assert_eq!(
                at("2024-01-15T10:30:00Z").to_rfc3339_nanos(),
                "2024-01-15T10:30:00.000000000Z"
            );
        }

        #[test]
        fn serde_roundtrip() {
            let ts = at("2024-01-01T00:00:00.123Z");
            let json = serde_json::to_string(&ts).unwrap();
            let deserialized: Timestamp = serde_json::from_str(&json).unwrap();
            assert_eq!(ts, deserialized);
            assert!(json.contains("2024"));
        }
    }
}
