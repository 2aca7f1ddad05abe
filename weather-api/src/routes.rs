//! Route handlers. Each one is stateless apart from the shared random source.

use axum::{Json, extract::State};
use chrono::{Local, Utc};
use weather_core::{
    ForecastEntry, Test2Payload, UnvalidatedRequest, ValidatedRequest, forecast,
};

use crate::{
    app::AppState,
    error::ProblemDetails,
    extract::{AppJson, Validated},
};

/// Five-day forecast with one calendar date per entry.
#[utoipa::path(
    get,
    path = "/weatherforecast",
    operation_id = "GetWeatherForecast",
    tag = "Weather Forecast",
    description = "Get the weather forecast for the next five days.",
    responses(
        (status = 200, description = "One entry per day, starting tomorrow", body = [ForecastEntry])
    )
)]
pub async fn get_weather_forecast(State(state): State<AppState>) -> Json<Vec<ForecastEntry>> {
    let today = Local::now().date_naive();

    Json(forecast::daily_forecast(
        state.random.as_ref(),
        today,
        state.config.service.summary_policy(),
    ))
}

/// Five-day forecast with UTC timestamps. Only even days carry a summary.
#[utoipa::path(
    get,
    path = "/test1",
    operation_id = "GetWeatherForecast",
    responses(
        (status = 200, description = "One entry per day, starting 24 hours from now", body = [ForecastEntry])
    )
)]
pub async fn get_timed_forecast(State(state): State<AppState>) -> Json<Vec<ForecastEntry>> {
    Json(forecast::timed_forecast(
        state.random.as_ref(),
        Utc::now(),
        state.config.service.summary_policy(),
    ))
}

/// Echo a request that satisfies every field constraint.
#[utoipa::path(
    post,
    path = "/test2",
    operation_id = "test2",
    request_body = Test2Payload,
    responses(
        (status = 200, description = "The request, echoed", body = ValidatedRequest),
        (status = 400, description = "Malformed JSON or violated field constraints",
            body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn echo_validated(
    Validated(request): Validated<ValidatedRequest>,
) -> Json<ValidatedRequest> {
    Json(request)
}

/// Echo whatever subset of the fields was sent; absent and null fields are omitted.
#[utoipa::path(
    post,
    path = "/test2",
    operation_id = "test2",
    request_body = UnvalidatedRequest,
    responses(
        (status = 200, description = "The request, echoed", body = UnvalidatedRequest),
        (status = 400, description = "Malformed JSON",
            body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn echo_unvalidated(
    AppJson(request): AppJson<UnvalidatedRequest>,
) -> Json<UnvalidatedRequest> {
    Json(request)
}
