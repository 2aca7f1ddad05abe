//! JSON date-time codec.
//!
//! Output is always UTC with millisecond precision and a `Z` designator,
//! e.g. `2024-06-01T00:00:00.000Z`. Input is parsed permissively: any RFC 3339
//! or RFC 2822 timestamp, an ISO-8601 timestamp without offset (read as UTC),
//! or a bare calendar date (read as UTC midnight).
//!
//! Use the [`offset`] and [`utc`] modules with `#[serde(with = "...")]`.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("'{0}' is not a recognized timestamp")]
    Unrecognized(String),

    #[error("timestamp is empty")]
    Empty,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Render `value` in UTC as `yyyy-MM-ddTHH:mm:ss.fffZ`.
pub fn format_timestamp<Tz: TimeZone>(value: &DateTime<Tz>) -> String {
    value
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any of the accepted textual forms, keeping the offset it carried.
pub fn parse_timestamp(text: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc().fixed_offset());
    }

    Err(TimestampError::Unrecognized(text.to_string()))
}

/// Serde codec for `DateTime<FixedOffset>`.
pub mod offset {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<FixedOffset>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| parse_timestamp(&text).map_err(de::Error::custom))
                .transpose()
        }
    }
}

/// Serde codec for plain `DateTime<Utc>` values.
pub mod utc {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        super::offset::deserialize(deserializer).map(|dt| dt.with_timezone(&Utc))
    }
}
