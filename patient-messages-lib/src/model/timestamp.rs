//! Timestamp decoding.
//!
//! The data endpoint is backed by SQLite `DATETIME` columns, so the same
//! field may arrive in several shapes:
//!
//! - `1700000000` or `1700000000.5` (Unix epoch seconds)
//! - `"2024-03-01T10:15:00Z"` (RFC 3339)
//! - `"2024-03-01 10:15:00"` (SQLite text, interpreted as UTC)

use std::fmt;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::TimeDelta;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Visitor;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Display format used for timestamps in row view-models.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time carried by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp from Unix epoch seconds.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    /// Parses a textual timestamp (RFC 3339 or SQLite `DATETIME`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns the underlying UTC date-time.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Signed duration from `earlier` to `self`.
    pub fn since(&self, earlier: Timestamp) -> TimeDelta {
        self.0.signed_duration_since(earlier.0)
    }

    /// Formats the timestamp for display.
    pub fn display(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("epoch seconds, an RFC 3339 string, or a SQLite DATETIME string")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Timestamp::from_unix(v).ok_or_else(|| E::custom(format!("timestamp out of range: {}", v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        let secs = i64::try_from(v)
            .map_err(|_| E::custom(format!("timestamp out of range: {}", v)))?;
        self.visit_i64(secs)
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if !v.is_finite() {
            return Err(E::custom("timestamp is not a finite number"));
        }
        let secs = v.floor();
        let nanos = ((v - secs) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
            .map(Timestamp)
            .ok_or_else(|| E::custom(format!("timestamp out of range: {}", v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Timestamp::parse(v).ok_or_else(|| E::custom(format!("unrecognised timestamp: {:?}", v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Timestamp, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_epoch_seconds() {
        let ts = decode("100").unwrap();
        assert_eq!(ts, Timestamp::from_unix(100).unwrap());
        assert_eq!(ts.display(), "1970-01-01 00:01:40");
    }

    #[test]
    fn test_fractional_seconds() {
        let ts = decode("1.5").unwrap();
        assert_eq!(ts.as_datetime().timestamp_millis(), 1500);
    }

    #[test]
    fn test_sqlite_datetime() {
        let ts = decode("\"2024-03-01 10:15:00\"").unwrap();
        assert_eq!(ts.display(), "2024-03-01 10:15:00");

        let ts = decode("\"2024-03-01 10:15:00.250\"").unwrap();
        assert_eq!(ts.as_datetime().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_rfc3339_normalised_to_utc() {
        let ts = decode("\"2024-03-01T12:15:00+02:00\"").unwrap();
        assert_eq!(ts.display(), "2024-03-01 10:15:00");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(decode("\"yesterday\"").is_err());
        assert!(decode("true").is_err());
    }

    #[test]
    fn test_since_is_signed() {
        let a = Timestamp::from_unix(100).unwrap();
        let b = Timestamp::from_unix(150).unwrap();
        assert_eq!(b.since(a).num_seconds(), 50);
        assert_eq!(a.since(b).num_seconds(), -50);
    }
}
