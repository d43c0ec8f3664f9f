//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /ping`                    - Liveness probe
//! - `GET  /health`                  - Database and cache checks
//! - `/api/v1/auth/*`                - Accounts (strict rate limit)
//! - `/api/v1/shortener-link/*`      - Short links (public rate limit)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin
//! - **Rate limiting** - Per-IP token bucket
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::handlers::{health_handler, ping_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{auth_routes, link_routes};
use crate::state::AppState;

/// Constructs the application router with trailing-slash normalization.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limited` - attach the per-IP limiters; they read the peer address,
///   so the server must be served with connect info when this is `true`
pub fn app_router(state: AppState, rate_limited: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state, rate_limited))
}

/// All routes and middleware except path normalization.
pub fn api_router(state: AppState, rate_limited: bool) -> Router {
    let mut auth = auth_routes(state.clone());
    let mut links = link_routes();

    if rate_limited {
        auth = auth.layer(rate_limit::secure_layer());
        links = links.layer(rate_limit::layer());
    }

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1/auth", auth)
        .nest("/api/v1/shortener-link", links)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}
