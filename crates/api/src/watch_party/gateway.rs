//! Host-authority write path and participant polling read path.

use watchparty_core::error::CoreError;
use watchparty_core::playback::{validate_position, EventKind};
use watchparty_core::types::DbId;
use watchparty_db::repositories::{ParticipantRepo, PartyEventRepo, WatchPartyRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::watch_party::{snapshot, EventAccepted, SessionView, StatusSnapshot, SESSION_ENTITY};

/// Apply a host transport event to the canonical playback state.
///
/// Runs in one transaction holding the session row lock: the authority
/// check, the state update, and the event append either all commit or none
/// do. Any early return drops the transaction, which rolls it back.
pub async fn submit_event(
    state: &AppState,
    session_id: DbId,
    user_id: DbId,
    raw_kind: &str,
    position_seconds: f64,
) -> AppResult<EventAccepted> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = state.pool.begin().await.map_err(storage("submit_event"))?;

    let session = WatchPartyRepo::lock_by_id(&mut tx, session_id)
        .await
        .map_err(storage("submit_event"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    if !session.is_host(user_id) {
        return Err(CoreError::Forbidden(
            "Only the host can control playback".to_string(),
        )
        .into());
    }

    let kind = EventKind::parse(raw_kind).map_err(CoreError::Validation)?;
    validate_position(position_seconds).map_err(CoreError::Validation)?;

    let next = session.playback().apply(kind, position_seconds);
    let session = WatchPartyRepo::update_playback(&mut tx, session_id, next)
        .await
        .map_err(storage("submit_event"))?;
    let event = PartyEventRepo::append(&mut tx, session_id, user_id, kind, position_seconds)
        .await
        .map_err(storage("submit_event"))?;

    tx.commit().await.map_err(storage("submit_event"))?;

    tracing::info!(
        session_id,
        user_id,
        event_id = event.id,
        kind = %kind,
        position_seconds,
        "Playback event accepted"
    );

    Ok(EventAccepted {
        event,
        session: SessionView::new(session, user_id, &state.config.public_base_url),
    })
}

/// Poll a session. Doubles as the caller's heartbeat.
pub async fn get_status(
    state: &AppState,
    session_id: DbId,
    user_id: DbId,
) -> AppResult<StatusSnapshot> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = state.pool.begin().await.map_err(storage("get_status"))?;

    WatchPartyRepo::hold_by_id(&mut tx, session_id)
        .await
        .map_err(storage("get_status"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    ParticipantRepo::touch(&mut *tx, session_id, user_id)
        .await
        .map_err(storage("get_status"))?
        .ok_or_else(|| {
            CoreError::Forbidden("You are not part of this watch party".to_string())
        })?;

    tx.commit().await.map_err(storage("get_status"))?;

    tracing::debug!(session_id, user_id, "Heartbeat refreshed");

    snapshot::read(&state.pool, &state.config, session_id, user_id).await
}
