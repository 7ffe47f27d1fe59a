pub mod health;
pub mod watch_party;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /watch-party
///     /sessions                          list (GET), create (POST)
///     /join                              join by code (POST)
///     /preview/{code}                    preview by code (GET)
///     /sessions/{id}/leave               leave (POST)
///     /sessions/{id}/events              host playback event (POST)
///     /sessions/{id}/messages            chat message (POST)
///     /sessions/{id}/status              poll + heartbeat (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/watch-party", watch_party::router())
}
