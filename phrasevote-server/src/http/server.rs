//! Axum server setup
//!
//! Server skeleton with:
//! - CORS allow-list (two local dev origins by default, extendable via env)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;

/// Origins allowed by default (local frontend dev servers)
const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://127.0.0.1:5173", "http://localhost:5173"];

/// Env var holding extra comma-separated origins
const CORS_ORIGINS_ENV: &str = "PHRASEVOTE_CORS_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// CORS origin allow-list, in order, deduplicated
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_origins: allowed_origins_from_env(),
        }
    }
}

/// Resolve the origin allow-list: defaults plus the comma-separated env
/// extension, trimmed, duplicates removed, order preserved.
pub fn allowed_origins_from_env() -> Vec<String> {
    merge_origins(std::env::var(CORS_ORIGINS_ENV).ok().as_deref())
}

fn merge_origins(extra: Option<&str>) -> Vec<String> {
    let extras = extra
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty());

    let mut origins: Vec<String> = Vec::new();
    for origin in DEFAULT_ALLOWED_ORIGINS.into_iter().chain(extras) {
        if !origins.iter().any(|seen| seen == origin) {
            origins.push(origin.to_owned());
        }
    }
    origins
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the application router with the /api surface, CORS, and tracing.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let config = ServerConfig::default();
/// run_server(pool, config).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServeError> {
    let state = AppState { pool };
    let app = build_router(state, &config.allowed_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config
            .allowed_origins
            .contains(&"http://localhost:5173".to_owned()));
    }

    #[test]
    fn defaults_only_when_env_absent() {
        assert_eq!(merge_origins(None), DEFAULT_ALLOWED_ORIGINS.to_vec());
    }

    #[test]
    fn extras_appended_in_order() {
        let origins = merge_origins(Some("https://quiz.example.com, https://staging.example.com"));
        assert_eq!(
            origins,
            vec![
                "http://127.0.0.1:5173",
                "http://localhost:5173",
                "https://quiz.example.com",
                "https://staging.example.com",
            ]
        );
    }

    #[test]
    fn duplicates_removed_order_preserved() {
        let origins = merge_origins(Some(
            "http://localhost:5173,https://a.example.com,https://a.example.com",
        ));
        assert_eq!(
            origins,
            vec![
                "http://127.0.0.1:5173",
                "http://localhost:5173",
                "https://a.example.com",
            ]
        );
    }

    #[test]
    fn blank_entries_ignored() {
        let origins = merge_origins(Some(" , ,,https://a.example.com,"));
        assert_eq!(origins.len(), 3);
        assert_eq!(origins[2], "https://a.example.com");
    }
}
