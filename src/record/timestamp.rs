//! Timestamp interpretation for record fields
//!
//! A field value is temporal if it is a JSON number (epoch milliseconds) or
//! an RFC 3339 string. Everything else has no chronological meaning.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Interprets a JSON value as a UTC timestamp.
///
/// - Numbers are epoch milliseconds.
/// - Strings are parsed as RFC 3339.
/// - Anything else returns `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_epoch_millis() {
        let ts = parse_timestamp(&json!(1_700_000_000_000_i64)).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_rfc3339_string() {
        let ts = parse_timestamp(&json!("2024-03-01T12:00:00Z")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_non_temporal_values() {
        assert!(parse_timestamp(&json!(null)).is_none());
        assert!(parse_timestamp(&json!("not a date")).is_none());
        assert!(parse_timestamp(&json!([1, 2])).is_none());
    }
}
