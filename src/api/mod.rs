//! StacksBuilder REST API
//!
//! HTTP API layer for StacksBuilder, built with Axum.
//!
//! # Endpoints
//!
//! ## Profiles
//! - `GET /api/v1/profiles/:address` - Profile lookup with reconciliation state
//! - `GET /api/v1/profiles/:address/exists` - Existence check
//! - `GET /api/v1/profiles/:address/stats` - Aggregate profile stats
//! - `GET /api/v1/stats/total` - Total registered profiles
//!
//! ## Cookies
//! - `POST /api/cookies` - Set or delete a cookie
//! - `GET /api/cookies?name=` - Read a cookie
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ApiConfig;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let profile_routes = Router::new()
        .route("/profiles/:address", get(routes::profiles::get_profile))
        .route(
            "/profiles/:address/exists",
            get(routes::profiles::profile_exists),
        )
        .route(
            "/profiles/:address/stats",
            get(routes::profiles::get_profile_stats),
        )
        .route("/stats/total", get(routes::profiles::get_total_profiles));

    let cookie_routes = Router::new().route(
        "/cookies",
        post(routes::cookies::write_cookie).get(routes::cookies::read_cookie),
    );

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let timeout = TimeoutLayer::new(Duration::from_secs(state.config.request_timeout_secs));
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", profile_routes)
        .nest("/api", cookie_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(timeout)
        .with_state(shared_state)
}

/// CORS from the configured origin list; a literal `*` opts into the
/// permissive wildcard. Origins that fail header-value parsing are
/// skipped with a warning rather than taking the server down.
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("StacksBuilder API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("StacksBuilder API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
