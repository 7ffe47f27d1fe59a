//! Handlers for watch parties: lifecycle, host playback events, chat, and
//! status polling.
//!
//! All endpoints require authentication via the `AuthUser` extractor.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use watchparty_core::types::DbId;
use watchparty_db::models::watch_party::{
    CreateWatchPartyRequest, JoinWatchPartyRequest, SendMessageRequest, SubmitEventRequest,
};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::watch_party::{chat, gateway, lifecycle};

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/watch-party/sessions
///
/// Create a session hosted by the caller. Returns 201 with the session,
/// its join code, and the share URL.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateWatchPartyRequest>,
) -> AppResult<impl IntoResponse> {
    let session = lifecycle::create_session(&state, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// GET /api/v1/watch-party/sessions
///
/// List live sessions the caller belongs to.
pub async fn list_sessions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sessions = lifecycle::list_sessions(&state, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// POST /api/v1/watch-party/join
///
/// Join by code. Returns the full status snapshot so the client can render
/// without a second round trip.
pub async fn join_session(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<JoinWatchPartyRequest>,
) -> AppResult<impl IntoResponse> {
    let snapshot = lifecycle::join_session(&state, auth.user_id, &input.code).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/v1/watch-party/preview/{code}
pub async fn preview_session(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath(code): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let preview = lifecycle::preview_session(&state, &code).await?;
    Ok(Json(ApiResponse::ok(preview)))
}

/// POST /api/v1/watch-party/sessions/{id}/leave
///
/// Host leaving ends the party for everyone (`outcome: "ended"`); anyone
/// else just leaves (`outcome: "left"`).
pub async fn leave_session(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = lifecycle::leave_session(&state, id, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(result)))
}

// ---------------------------------------------------------------------------
// Synchronization
// ---------------------------------------------------------------------------

/// POST /api/v1/watch-party/sessions/{id}/events
///
/// Host-only. Applies a play/pause/seek/buffering event.
pub async fn submit_event(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SubmitEventRequest>,
) -> AppResult<impl IntoResponse> {
    let accepted =
        gateway::submit_event(&state, id, auth.user_id, &input.kind, input.position_seconds)
            .await?;
    Ok(Json(ApiResponse::ok(accepted)))
}

/// GET /api/v1/watch-party/sessions/{id}/status
///
/// Polling endpoint for active participants; also records their heartbeat.
pub async fn get_status(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let snapshot = gateway::get_status(&state, id, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// POST /api/v1/watch-party/sessions/{id}/messages
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let message = chat::send_message(&state, id, auth.user_id, &input.body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}
