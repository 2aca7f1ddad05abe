//! HTTP surface of the weather forecast sample services.
//!
//! This crate focuses on:
//! - Routing each service variant to its handlers
//! - Request extraction and problem-details error responses
//! - The middleware stack (tracing, HTTPS redirection, origin guard, CORS)
//! - Publishing the OpenAPI document

pub mod app;
pub mod error;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use app::{AppState, router, serve, shutdown_signal};
pub use error::{ApiError, ProblemDetails, SetupError};
