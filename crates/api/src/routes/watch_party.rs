//! Route definitions for watch parties.
//!
//! All endpoints require authentication via `AuthUser` extractor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::watch_party;
use crate::state::AppState;

/// Watch party routes mounted at `/watch-party`.
///
/// ```text
/// GET  /sessions                 -> list_sessions
/// POST /sessions                 -> create_session
/// POST /join                     -> join_session
/// GET  /preview/{code}           -> preview_session
/// POST /sessions/{id}/leave      -> leave_session
/// POST /sessions/{id}/events     -> submit_event
/// POST /sessions/{id}/messages   -> send_message
/// GET  /sessions/{id}/status     -> get_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            get(watch_party::list_sessions).post(watch_party::create_session),
        )
        .route("/join", post(watch_party::join_session))
        .route("/preview/{code}", get(watch_party::preview_session))
        .route("/sessions/{id}/leave", post(watch_party::leave_session))
        .route("/sessions/{id}/events", post(watch_party::submit_event))
        .route("/sessions/{id}/messages", post(watch_party::send_message))
        .route("/sessions/{id}/status", get(watch_party::get_status))
}
