//! Core library for the weather forecast sample services.
//!
//! This crate defines:
//! - The forecast model and its synthetic generator
//! - Request validation for the strict echo endpoint
//! - The JSON date-time codec
//! - Configuration handling and the selectable service variants
//!
//! It is used by `weather-api`, but has no HTTP dependencies of its own.

pub mod codec;
pub mod config;
pub mod forecast;
pub mod model;
pub mod random;
pub mod service;
pub mod validation;

pub use config::{Config, Environment, Overrides};
pub use forecast::{SUMMARIES, SummaryPolicy, daily_forecast, timed_forecast};
pub use model::{ForecastDate, ForecastEntry, Test2Payload, UnvalidatedRequest, ValidatedRequest};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use service::{Endpoint, Route, ServiceVariant};
pub use validation::{FromPayload, ValidationFailure};
