use std::sync::Arc;

use watchparty_core::catalog::Catalog;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: watchparty_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Content catalog used to validate content references on create.
    pub catalog: Arc<dyn Catalog>,
}
