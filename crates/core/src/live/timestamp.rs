//! Normalization of upstream timestamp encodings.
//!
//! Documents written by the API routes store ISO-8601 strings, documents
//! written by client SDKs store native timestamp objects, and older seed data
//! uses epoch milliseconds. All of them end up as `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::{Error, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampRepr {
    Text(String),
    Millis(i64),
    FractionalMillis(f64),
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
}

impl TimestampRepr {
    fn into_datetime(self) -> std::result::Result<DateTime<Utc>, String> {
        match self {
            Self::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", text, e)),
            Self::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| format!("{} ms is out of range", ms)),
            Self::FractionalMillis(ms) => {
                if !ms.is_finite() {
                    return Err(format!("{} is not a finite millisecond value", ms));
                }
                DateTime::from_timestamp_millis(ms.trunc() as i64)
                    .ok_or_else(|| format!("{} ms is out of range", ms))
            }
            Self::Native {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(seconds, nanoseconds)
                .ok_or_else(|| format!("{}s {}ns is out of range", seconds, nanoseconds)),
        }
    }
}

/// Serde `deserialize_with` adapter accepting every supported encoding.
pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    TimestampRepr::deserialize(deserializer)?
        .into_datetime()
        .map_err(serde::de::Error::custom)
}

/// Parses a timestamp out of an arbitrary JSON value.
pub fn parse_timestamp(value: &Value) -> Result<DateTime<Utc>> {
    let repr = TimestampRepr::deserialize(value)
        .map_err(|_| Error::Timestamp(format!("unsupported timestamp encoding: {}", value)))?;
    repr.into_datetime().map_err(Error::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_iso_string() {
        let ts = parse_timestamp(&json!("2025-03-01T09:30:00.000Z")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_offset_string_normalizes_to_utc() {
        let ts = parse_timestamp(&json!("2025-03-01T11:30:00+02:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_millis() {
        let ts = parse_timestamp(&json!(1_700_000_000_123i64)).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_parse_native_timestamp_object() {
        let ts = parse_timestamp(&json!({ "seconds": 1_700_000_000, "nanoseconds": 500 })).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_nanos(), 500);

        let underscored =
            parse_timestamp(&json!({ "_seconds": 1_700_000_000, "_nanoseconds": 500 })).unwrap();
        assert_eq!(underscored, ts);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_timestamp(&json!("yesterday")),
            Err(Error::Timestamp(_))
        ));
        assert!(matches!(parse_timestamp(&json!(true)), Err(Error::Timestamp(_))));
        assert!(matches!(parse_timestamp(&json!(null)), Err(Error::Timestamp(_))));
    }
}
