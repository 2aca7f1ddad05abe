//! Router assembly and the server loop.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{MethodRouter, get, post},
};
use tower_http::trace::TraceLayer;
use weather_core::{Config, Endpoint, RandomSource, ThreadRandom};

use crate::{
    error::SetupError,
    middleware::{AllowedOrigin, HttpsPort, cors_layer, https_redirect, origin_guard},
    openapi, routes,
};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub random: Arc<dyn RandomSource>,
}

impl AppState {
    /// State drawing from the per-thread random generator.
    pub fn new(config: Config) -> Self {
        Self::with_random(config, ThreadRandom)
    }

    pub fn with_random(config: Config, random: impl RandomSource + 'static) -> Self {
        Self {
            config: Arc::new(config),
            random: Arc::new(random),
        }
    }
}

/// Build the router for the configured service variant.
///
/// Layers, outermost first: trace, origin guard, CORS, HTTPS redirect, routes.
/// The redirect sits inside CORS so preflights are answered before any 307.
pub fn router(state: AppState) -> Result<Router, SetupError> {
    let config = Arc::clone(&state.config);
    let service = config.service;

    let mut app = service
        .routes()
        .iter()
        .fold(Router::new(), |app, route| {
            app.route(route.path, endpoint_handler(route.endpoint))
        })
        .with_state(state);

    if config.docs_enabled() {
        app = app.merge(openapi::routes(service));
    }

    if let Some(port) = config.https_port {
        app = app.layer(from_fn_with_state(HttpsPort(port), https_redirect));
    }

    if service.uses_cors() {
        let origin = HeaderValue::from_str(&config.allowed_origin).map_err(|source| {
            SetupError::InvalidOrigin {
                origin: config.allowed_origin.clone(),
                source,
            }
        })?;

        app = app
            .layer(cors_layer(origin.clone()))
            .layer(from_fn_with_state(AllowedOrigin(origin), origin_guard));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}

fn endpoint_handler(endpoint: Endpoint) -> MethodRouter<AppState> {
    match endpoint {
        Endpoint::DailyForecast => get(routes::get_weather_forecast),
        Endpoint::TimedForecast => get(routes::get_timed_forecast),
        Endpoint::StrictEcho => post(routes::echo_validated),
        Endpoint::LenientEcho => post(routes::echo_unvalidated),
    }
}

/// Bind `config.listen` and serve until `shutdown` resolves.
pub async fn serve(
    config: Config,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    log_startup(&config);

    let app = router(AppState::new(config.clone()))?;
    let listener = tokio::net::TcpListener::bind(config.listen).await?;

    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn log_startup(config: &Config) {
    tracing::info!(
        service = %config.service,
        environment = %config.environment,
        listen = %config.listen,
        docs = config.docs_enabled(),
        cors = config.service.uses_cors(),
        "Starting weather service"
    );

    for route in config.service.routes() {
        tracing::info!(method = route.method, path = route.path, "Route");
    }

    if config.docs_enabled() {
        tracing::info!(path = openapi::DOCUMENT_PATH, "OpenAPI document enabled");
    }

    match config.https_port {
        Some(port) => tracing::info!(port, "Redirecting plain HTTP to HTTPS"),
        None => tracing::warn!("No HTTPS port configured, HTTPS redirection is disabled"),
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
