//! Route handlers organized by resource

pub mod health;
pub mod quiz;
pub mod vote;

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

/// Assemble the /api surface.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(quiz::router())
        .merge(vote::router())
}
