use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::codec;

/// Divisor of the Celsius to Fahrenheit conversion used by every variant.
const CELSIUS_PER_FAHRENHEIT_DEGREE: f64 = 0.5556;

/// Date attached to a forecast entry.
///
/// Calendar dates serialize as `yyyy-MM-dd`; instants go through the
/// timestamp codec and always come out in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastDate {
    Day(NaiveDate),
    Instant(DateTime<FixedOffset>),
}

impl Serialize for ForecastDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ForecastDate::Day(date) => date.serialize(serializer),
            ForecastDate::Instant(at) => codec::offset::serialize(at, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ForecastDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;

        if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
            return Ok(ForecastDate::Day(date));
        }

        codec::parse_timestamp(&text)
            .map(ForecastDate::Instant)
            .map_err(de::Error::custom)
    }
}

/// One synthetic weather record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEntry {
    /// Calendar date (`2024-06-01`) or UTC timestamp (`2024-06-01T00:00:00.000Z`).
    #[schema(value_type = String, example = "2024-06-01")]
    date: ForecastDate,
    #[schema(example = 21)]
    temperature_c: i32,
    #[schema(example = 69)]
    temperature_f: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Mild")]
    summary: Option<String>,
}

impl ForecastEntry {
    pub fn new(date: ForecastDate, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: fahrenheit(temperature_c),
            summary,
        }
    }

    pub fn date(&self) -> ForecastDate {
        self.date
    }

    pub fn temperature_c(&self) -> i32 {
        self.temperature_c
    }

    pub fn temperature_f(&self) -> i32 {
        self.temperature_f
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// `32 + round(c / 0.5556)`, saturating at the `i32` bounds.
pub fn fahrenheit(celsius: i32) -> i32 {
    let scaled = (f64::from(celsius) / CELSIUS_PER_FAHRENHEIT_DEGREE).round() as i32;
    scaled.saturating_add(32)
}

/// Wire shape of the strict `POST /test2` body, before validation.
///
/// Every field is optional here so a missing field is reported together with
/// the other violations instead of failing deserialization on the first one.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct Test2Payload {
    #[validate(
        required(message = "The name field is required."),
        custom(function = "not_blank", message = "The name field is required."),
        length(
            min = 3,
            max = 40,
            message = "The field name must be a string with a minimum length of 3 and a maximum length of 40."
        )
    )]
    #[schema(required = true, min_length = 3, max_length = 40, example = "Ada")]
    pub name: Option<String>,

    #[validate(
        required(message = "The age field is required."),
        range(min = 0, max = 100, message = "The field age must be between 0 and 100.")
    )]
    #[schema(required = true, minimum = 0, maximum = 100, example = 36)]
    pub age: Option<i64>,

    #[validate(
        required(message = "The city field is required."),
        custom(function = "not_blank", message = "The city field is required.")
    )]
    #[schema(required = true, min_length = 1, example = "London")]
    pub city: Option<String>,
}

/// Empty and whitespace-only strings count as missing.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A `POST /test2` body that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidatedRequest {
    pub name: String,
    pub age: i64,
    pub city: String,
}

/// The lenient `POST /test2` body: no constraints, absent fields stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UnvalidatedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}
