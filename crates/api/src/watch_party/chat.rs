//! Chat message append.

use watchparty_core::error::CoreError;
use watchparty_core::types::DbId;
use watchparty_core::watch_party::prepare_message_body;
use watchparty_db::models::watch_party::PartyMessage;
use watchparty_db::repositories::{ParticipantRepo, PartyMessageRepo, WatchPartyRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::watch_party::SESSION_ENTITY;

fn not_a_member() -> CoreError {
    CoreError::Forbidden("You are not part of this watch party".to_string())
}

/// Post a chat message as an active participant (host or not).
pub async fn send_message(
    state: &AppState,
    session_id: DbId,
    user_id: DbId,
    raw_body: &str,
) -> AppResult<PartyMessage> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = state.pool.begin().await.map_err(storage("send_message"))?;

    WatchPartyRepo::hold_by_id(&mut tx, session_id)
        .await
        .map_err(storage("send_message"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    ParticipantRepo::find_active(&mut *tx, session_id, user_id)
        .await
        .map_err(storage("send_message"))?
        .ok_or_else(not_a_member)?;

    let body = prepare_message_body(raw_body).map_err(CoreError::Validation)?;

    // The insert re-checks membership in case the sender left in between.
    let message = PartyMessageRepo::create_if_member(&mut *tx, session_id, user_id, &body)
        .await
        .map_err(storage("send_message"))?
        .ok_or_else(not_a_member)?;

    tx.commit().await.map_err(storage("send_message"))?;

    tracing::debug!(session_id, user_id, message_id = message.id, "Message posted");

    Ok(message)
}
