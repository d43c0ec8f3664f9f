//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and mail setup, and the Axum server
//! lifecycle.

use crate::application::services::{AuthService, LinkService};
use crate::config::Config;
use crate::domain::ports::Notifier;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::mail::{LogNotifier, SmtpNotifier};
use crate::infrastructure::persistence::{
    PgLinkRepository, PgUserRepository, connect_pool, run_migrations,
};
use crate::infrastructure::security::Argon2JwtCredentials;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::otp::OtpHasher;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - SMTP notifier (or log-only fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config.database_url, config.pool)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    let cache = build_cache(&config).await;
    let notifier = build_notifier(&config);

    let pool = Arc::new(pool);
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let links = Arc::new(PgLinkRepository::new(pool));

    let credentials = Arc::new(Argon2JwtCredentials::new(
        &config.jwt_secret,
        config.jwt_expiry_hours,
    ));

    let auth_service = Arc::new(AuthService::new(
        users,
        credentials,
        notifier,
        OtpHasher::new(&config.jwt_secret),
        config.otp_ttl_minutes,
    ));
    let link_service = Arc::new(LinkService::new(
        links,
        cache.clone(),
        config.cache_ttl_seconds,
    ));

    let state = AppState::new(
        auth_service,
        link_service,
        cache,
        &config.list_limits,
        config.base_url.clone(),
    );

    let app = app_router(state, true);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    let Some(smtp) = &config.smtp else {
        tracing::info!("SMTP not configured; emails will be logged");
        return Arc::new(LogNotifier);
    };

    match SmtpNotifier::new(smtp) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            tracing::warn!("Failed to set up SMTP: {}. Emails will be logged.", e);
            Arc::new(LogNotifier)
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
