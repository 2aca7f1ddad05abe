use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use thiserror::Error;

use crate::forecast::SummaryPolicy;

/// The sample services this workspace can serve. Each one exercises a
/// different platform feature over the same forecast data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceVariant {
    /// OpenAPI metadata and a single-origin CORS policy.
    #[default]
    Documented,
    /// Strict request-body validation on `POST /test2`.
    Validated,
    /// Custom timestamp encoding and a lenient `POST /test2`.
    JsonCodec,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown service '{0}'. Supported services: documented, validated, json-codec.")]
pub struct UnknownService(pub String);

/// The operation a route is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Forecast keyed by calendar date.
    DailyForecast,
    /// Forecast keyed by UTC timestamp.
    TimedForecast,
    StrictEcho,
    LenientEcho,
}

/// One entry of a variant's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub endpoint: Endpoint,
}

impl ServiceVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceVariant::Documented => "documented",
            ServiceVariant::Validated => "validated",
            ServiceVariant::JsonCodec => "json-codec",
        }
    }

    pub const fn all() -> &'static [ServiceVariant] {
        &[
            ServiceVariant::Documented,
            ServiceVariant::Validated,
            ServiceVariant::JsonCodec,
        ]
    }

    /// Summary policy used by this variant's forecast route.
    pub fn summary_policy(&self) -> SummaryPolicy {
        match self {
            ServiceVariant::JsonCodec => SummaryPolicy::EvenDaysOnly,
            _ => SummaryPolicy::Always,
        }
    }

    /// Only the documented variant restricts cross-origin callers.
    pub fn uses_cors(&self) -> bool {
        matches!(self, ServiceVariant::Documented)
    }

    /// Application routes, excluding the documentation endpoints.
    pub fn routes(&self) -> &'static [Route] {
        const FORECAST: Route = Route {
            method: "GET",
            path: "/weatherforecast",
            endpoint: Endpoint::DailyForecast,
        };
        const TIMED_FORECAST: Route = Route {
            method: "GET",
            path: "/test1",
            endpoint: Endpoint::TimedForecast,
        };
        const STRICT_ECHO: Route = Route {
            method: "POST",
            path: "/test2",
            endpoint: Endpoint::StrictEcho,
        };
        const LENIENT_ECHO: Route = Route {
            method: "POST",
            path: "/test2",
            endpoint: Endpoint::LenientEcho,
        };

        match self {
            ServiceVariant::Documented => &[FORECAST],
            ServiceVariant::Validated => &[FORECAST, STRICT_ECHO],
            ServiceVariant::JsonCodec => &[TIMED_FORECAST, LENIENT_ECHO],
        }
    }
}

impl fmt::Display for ServiceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceVariant {
    type Error = UnknownService;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "documented" => Ok(ServiceVariant::Documented),
            "validated" => Ok(ServiceVariant::Validated),
            "json-codec" | "json_codec" => Ok(ServiceVariant::JsonCodec),
            _ => Err(UnknownService(value.to_string())),
        }
    }
}

impl FromStr for ServiceVariant {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceVariant::try_from(s)
    }
}
