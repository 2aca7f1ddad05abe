//! HTTP error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use weather_core::ValidationFailure;

const BAD_REQUEST_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.1";
const PROBLEM_JSON: &str = "application/problem+json";

/// Errors a request can fail with. All of them are the caller's fault.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("One or more validation errors occurred.")]
    Validation(#[from] ValidationFailure),

    #[error("{0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

/// RFC 9457 problem details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Violated constraints, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn to_problem(&self) -> ProblemDetails {
        let status = self.status();
        match self {
            ApiError::Validation(failure) => ProblemDetails {
                kind: BAD_REQUEST_TYPE.to_string(),
                title: self.to_string(),
                status: status.as_u16(),
                detail: None,
                errors: failure.errors().clone(),
            },
            ApiError::MalformedBody(detail) => ProblemDetails {
                kind: BAD_REQUEST_TYPE.to_string(),
                title: "The request body could not be read.".to_string(),
                status: status.as_u16(),
                detail: Some(detail.clone()),
                errors: BTreeMap::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.to_problem())).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

/// Failures while assembling the router from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid allowed origin '{origin}': {source}")]
    InvalidOrigin {
        origin: String,
        source: header::InvalidHeaderValue,
    },
}
