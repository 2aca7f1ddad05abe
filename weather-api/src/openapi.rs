//! OpenAPI documents, one per service variant.
//!
//! Served at `/swagger` and `/swagger/v1/swagger.json`, in development only.

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;
use weather_core::{
    ForecastEntry, ServiceVariant, Test2Payload, UnvalidatedRequest, ValidatedRequest,
};

use crate::{error::ProblemDetails, routes};

pub const DOCUMENT_PATH: &str = "/swagger/v1/swagger.json";
pub const DISCOVERY_PATH: &str = "/swagger";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather API",
        version = "v1",
        description = "A web API for weather forecasts.",
        contact(name = "Weather API Admin", url = "https://example.com/admin")
    ),
    servers(
        (url = "http://localhost:5252", description = "Localhost")
    ),
    paths(routes::get_weather_forecast),
    components(schemas(ForecastEntry)),
    tags(
        (name = "Weather Forecast", description = "Weather forecast operations")
    )
)]
pub struct DocumentedApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather API",
        version = "v1",
        description = "Forecasts and a validated echo endpoint."
    ),
    paths(routes::get_weather_forecast, routes::echo_validated),
    components(schemas(ForecastEntry, Test2Payload, ValidatedRequest, ProblemDetails))
)]
pub struct ValidatedApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weather API",
        version = "v1",
        description = "Forecasts with UTC timestamps and a lenient echo endpoint."
    ),
    paths(routes::get_timed_forecast, routes::echo_unvalidated),
    components(schemas(ForecastEntry, UnvalidatedRequest, ProblemDetails))
)]
pub struct JsonCodecApi;

/// The document describing `service`'s routes.
pub fn document(service: ServiceVariant) -> utoipa::openapi::OpenApi {
    match service {
        ServiceVariant::Documented => DocumentedApi::openapi(),
        ServiceVariant::Validated => ValidatedApi::openapi(),
        ServiceVariant::JsonCodec => JsonCodecApi::openapi(),
    }
}

/// Discovery routes serving `service`'s document.
pub fn routes<S: Clone + Send + Sync + 'static>(service: ServiceVariant) -> Router<S> {
    let doc = document(service);
    let serve = move || {
        let doc = doc.clone();
        async move { Json(doc) }
    };

    Router::new()
        .route(DISCOVERY_PATH, get(serve.clone()))
        .route(DOCUMENT_PATH, get(serve))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn json(service: ServiceVariant) -> Value {
        serde_json::to_value(document(service)).unwrap()
    }

    #[test]
    fn documents_list_exactly_the_variant_routes() {
        for service in ServiceVariant::all() {
            let doc = json(*service);
            let paths = doc["paths"].as_object().expect("paths object");

            let mut documented: Vec<_> = paths.keys().map(String::as_str).collect();
            let mut routed: Vec<_> = service.routes().iter().map(|r| r.path).collect();
            documented.sort_unstable();
            routed.sort_unstable();

            assert_eq!(documented, routed, "{service}");

            for route in service.routes() {
                let method = route.method.to_lowercase();
                assert!(paths[route.path].get(&method).is_some(), "{service} {method} {}", route.path);
            }
        }
    }

    #[test]
    fn documented_variant_carries_metadata() {
        let doc = json(ServiceVariant::Documented);

        assert_eq!(doc["info"]["title"], "Weather API");
        assert_eq!(doc["info"]["contact"]["name"], "Weather API Admin");
        assert_eq!(doc["servers"][0]["url"], "http://localhost:5252");
        assert_eq!(doc["tags"][0]["name"], "Weather Forecast");
        assert_eq!(doc["tags"][0]["description"], "Weather forecast operations");

        let op = &doc["paths"]["/weatherforecast"]["get"];
        assert_eq!(op["operationId"], "GetWeatherForecast");
        assert_eq!(op["description"], "Get the weather forecast for the next five days.");
        assert_eq!(op["tags"][0], "Weather Forecast");
    }

    #[test]
    fn validated_variant_documents_the_echo() {
        let doc = json(ServiceVariant::Validated);

        assert_eq!(doc["paths"]["/test2"]["post"]["operationId"], "test2");
        assert!(doc["components"]["schemas"]["Test2Payload"].is_object());
        assert!(doc["paths"]["/test2"]["post"]["responses"]["400"].is_object());
    }

    #[test]
    fn only_the_documented_forecast_is_tagged() {
        let doc = json(ServiceVariant::JsonCodec);

        let tags = &doc["paths"]["/test1"]["get"]["tags"];
        let tagged = tags
            .as_array()
            .is_some_and(|tags| tags.iter().any(|t| t == "Weather Forecast"));
        assert!(!tagged, "{tags}");
    }

    #[test]
    fn forecast_schema_uses_wire_names() {
        let doc = json(ServiceVariant::JsonCodec);
        let props = &doc["components"]["schemas"]["ForecastEntry"]["properties"];

        for key in ["date", "temperatureC", "temperatureF", "summary"] {
            assert!(props.get(key).is_some(), "missing {key}");
        }
    }
}
