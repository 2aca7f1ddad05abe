//! Middleware stack, outermost first: origin guard, CORS, HTTPS redirection.
//!
//! CORS answers preflights before the redirect can turn them into a 307.
//! Request tracing wraps all of them and is added in [`crate::app::router`].

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header, uri::Scheme},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_http::cors::{Any, CorsLayer};

/// Lets the single allowed origin call with any method and header.
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[derive(Debug, Clone)]
pub struct AllowedOrigin(pub HeaderValue);

/// Rejects requests whose `Origin` is anything but the allowed one.
///
/// Requests without an `Origin` header are not cross-origin and pass through.
pub async fn origin_guard(
    State(AllowedOrigin(allowed)): State<AllowedOrigin>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if *origin != allowed => {
            tracing::warn!(origin = ?origin, "Rejected cross-origin request");
            StatusCode::FORBIDDEN.into_response()
        }
        _ => next.run(request).await,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HttpsPort(pub u16);

/// Sends plain-HTTP requests to the same location on `https://`.
pub async fn https_redirect(
    State(HttpsPort(port)): State<HttpsPort>,
    request: Request,
    next: Next,
) -> Response {
    if is_https(&request) {
        return next.run(request).await;
    }

    match redirect_target(&request, port) {
        Some(location) => Redirect::temporary(&location).into_response(),
        // No usable Host header: nothing to redirect to.
        None => next.run(request).await,
    }
}

fn is_https(request: &Request) -> bool {
    if request.uri().scheme() == Some(&Scheme::HTTPS) {
        return true;
    }

    request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

fn redirect_target(request: &Request, port: u16) -> Option<String> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host())?;
    let host = host_without_port(host);

    let path = request
        .uri()
        .path_and_query()
        .map_or("/", |pq| pq.as_str());

    Some(match port {
        443 => format!("https://{host}{path}"),
        _ => format!("https://{host}:{port}{path}"),
    })
}

fn host_without_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal, keep the brackets.
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }

    host.rsplit_once(':').map_or(host, |(name, _)| name)
}
