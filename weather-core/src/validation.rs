//! Request validation.
//!
//! A request type declares its untrusted wire payload and how to turn it into
//! the typed value. Every violated field is collected before failing.

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::model::{Test2Payload, ValidatedRequest};

/// Field-level violations, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed for: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationFailure {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationFailure {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut failure = ValidationFailure::default();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The field {field} is invalid ({}).", error.code));
                failure.add(field.to_string(), message);
            }
        }

        failure
    }
}

/// Types built from an untrusted payload that must be checked first.
pub trait FromPayload: Sized {
    type Payload: DeserializeOwned + Send;

    fn from_payload(payload: Self::Payload) -> Result<Self, ValidationFailure>;
}

impl FromPayload for ValidatedRequest {
    type Payload = Test2Payload;

    fn from_payload(payload: Test2Payload) -> Result<Self, ValidationFailure> {
        payload.validate()?;

        match payload {
            Test2Payload {
                name: Some(name),
                age: Some(age),
                city: Some(city),
            } => Ok(ValidatedRequest { name, age, city }),
            // `validate` reports missing fields as `required` violations.
            Test2Payload { name, age, city } => {
                let mut failure = ValidationFailure::default();
                if name.is_none() {
                    failure.add("name", "The name field is required.");
                }
                if age.is_none() {
                    failure.add("age", "The age field is required.");
                }
                if city.is_none() {
                    failure.add("city", "The city field is required.");
                }
                Err(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, age: Option<i64>, city: Option<&str>) -> Test2Payload {
        Test2Payload {
            name: name.map(str::to_string),
            age,
            city: city.map(str::to_string),
        }
    }

    #[test]
    fn valid_payload_becomes_typed_request() {
        let request =
            ValidatedRequest::from_payload(payload(Some("Ada"), Some(0), Some("London"))).unwrap();

        assert_eq!(
            request,
            ValidatedRequest {
                name: "Ada".into(),
                age: 0,
                city: "London".into(),
            }
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        let forty = "x".repeat(40);
        assert!(ValidatedRequest::from_payload(payload(Some(&forty), Some(100), Some("Oslo"))).is_ok());
        assert!(ValidatedRequest::from_payload(payload(Some("abc"), Some(0), Some("X"))).is_ok());
    }

    #[test]
    fn every_violated_field_is_reported() {
        let err = ValidatedRequest::from_payload(payload(Some("Al"), Some(101), Some("")))
            .unwrap_err();

        assert_eq!(err.fields().collect::<Vec<_>>(), ["age", "city", "name"]);
        assert_eq!(
            err.errors()["age"],
            ["The field age must be between 0 and 100."]
        );
    }

    #[test]
    fn missing_fields_are_required_violations() {
        let err = ValidatedRequest::from_payload(Test2Payload::default()).unwrap_err();

        assert_eq!(err.fields().collect::<Vec<_>>(), ["age", "city", "name"]);
        assert_eq!(err.errors()["name"], ["The name field is required."]);
    }

    #[test]
    fn whitespace_only_strings_are_required_violations() {
        let err = ValidatedRequest::from_payload(payload(Some("   "), Some(30), Some(" ")))
            .unwrap_err();

        assert_eq!(err.fields().collect::<Vec<_>>(), ["city", "name"]);
        assert_eq!(err.errors()["name"], ["The name field is required."]);
        assert_eq!(err.errors()["city"], ["The city field is required."]);
    }

    #[test]
    fn empty_city_is_reported_once() {
        let err = ValidatedRequest::from_payload(payload(Some("Ada"), Some(30), Some("")))
            .unwrap_err();

        assert_eq!(err.errors()["city"], ["The city field is required."]);
    }

    #[test]
    fn name_too_long_and_negative_age() {
        let long = "y".repeat(41);
        let err = ValidatedRequest::from_payload(payload(Some(&long), Some(-1), Some("Rome")))
            .unwrap_err();

        assert_eq!(err.fields().collect::<Vec<_>>(), ["age", "name"]);
        assert!(err.to_string().contains("age, name"));
    }

    #[test]
    fn failure_collects_messages_per_field() {
        let mut failure = ValidationFailure::default();
        assert!(failure.is_empty());

        failure.add("name", "first");
        failure.add("name", "second");

        assert_eq!(failure.into_errors()["name"], ["first", "second"]);
    }
}
