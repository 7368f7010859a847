//! Parsing and formatting of API timestamps.
//!
//! Timestamps on the wire are naive `"YYYY-MM-DD HH:MM:SS"` strings in UTC.
//! Date-only values appear in some payloads and are treated as midnight.

use chrono::{NaiveDate, NaiveDateTime};

pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_ONLY: &str = "%Y-%m-%d";

pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FORMAT).ok().or_else(|| {
        NaiveDate::parse_from_str(raw, DATE_ONLY)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

pub fn format(timestamp: &NaiveDateTime) -> String {
    timestamp.format(FORMAT).to_string()
}

/// serde adapter for optional timestamp fields in the API format.
pub mod optional {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => serializer.serialize_some(&super::format(timestamp)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_timestamps() {
        let parsed = parse("2019-03-04 15:30:00").unwrap();
        assert_eq!(format(&parsed), "2019-03-04 15:30:00");
    }

    #[test]
    fn parses_date_only_as_midnight() {
        let parsed = parse("2019-03-04").unwrap();
        assert_eq!(format(&parsed), "2019-03-04 00:00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("next tuesday").is_none());
    }
}
