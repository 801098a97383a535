//! Timestamp formatting and parsing.
//!
//! Instant-valued fields are rendered on the wire as `yyyy-MM-dd HH:mm:ss`
//! in UTC; date-valued fields use plain ISO `yyyy-MM-dd`. Query parameters
//! additionally accept the ISO-local form (`2024-02-01T00:00:00`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse an instant from either the ISO-local form or the fixed
/// `yyyy-MM-dd HH:mm:ss` form; a bare date is accepted as midnight UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n)))
}

/// Parse a `yyyy-MM-dd` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Serde adapter for mandatory instant fields.
pub mod utc_format {
    use super::*;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(DATETIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp '{raw}' (expected yyyy-MM-dd HH:mm:ss)"))
        })
    }
}

/// Serde adapter for optional instant fields.
pub mod utc_format_opt {
    use super::*;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_str(&instant.format(DATETIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse_datetime(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "invalid timestamp '{raw}' (expected yyyy-MM-dd HH:mm:ss)"
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_iso_local_and_fixed_forms() {
        let a = parse_datetime("2024-02-01T00:00:00").unwrap();
        let b = parse_datetime("2024-02-01 00:00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bare_date_becomes_midnight_utc() {
        let parsed = parse_datetime("2024-03-15").unwrap();
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_date("2024/01/01").is_none());
    }
}
