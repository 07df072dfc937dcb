//! phrasevote-server: HTTP backend for the A/B phrase voting quiz
//!
//! Serves active phrase pairs with live vote totals and records one vote
//! per session per pair, backed by PostgreSQL.

pub mod db;
pub mod http;
pub mod models;
pub mod seed;

pub use db::{create_pool, DbError};
pub use http::{run_server, ApiError, AppState, ServerConfig};
