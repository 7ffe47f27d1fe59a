use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether the background expiry sweep is configured to run.
    pub expiry_sweep_enabled: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let db_healthy = watchparty_db::health_check(&state.pool).await.is_ok();

    Json(ApiResponse::ok(HealthStatus {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        expiry_sweep_enabled: state.config.watch_party.sweep_interval_secs > 0,
    }))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
