//! Consistent merged read of one session.

use sqlx::PgPool;
use watchparty_core::error::CoreError;
use watchparty_core::types::{DbId, Timestamp};
use watchparty_db::repositories::{
    ParticipantRepo, PartyEventRepo, PartyMessageRepo, WatchPartyRepo,
};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::watch_party::{ParticipantPresence, SessionView, StatusSnapshot, SESSION_ENTITY};

/// Read session, participants, recent events, and recent messages from a
/// single `REPEATABLE READ` snapshot.
///
/// Every event write commits together with its session update, so inside one
/// snapshot the session position always matches the newest event.
pub async fn read(
    pool: &PgPool,
    config: &ServerConfig,
    session_id: DbId,
    viewer: DbId,
) -> AppResult<StatusSnapshot> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = pool.begin().await.map_err(storage("snapshot"))?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(storage("snapshot"))?;

    let server_time: Timestamp = sqlx::query_scalar("SELECT NOW()")
        .fetch_one(&mut *tx)
        .await
        .map_err(storage("snapshot"))?;

    let session = WatchPartyRepo::find_by_id(&mut *tx, session_id)
        .await
        .map_err(storage("snapshot"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    let participants = ParticipantRepo::list_active(&mut *tx, session_id)
        .await
        .map_err(storage("snapshot"))?;

    let events = PartyEventRepo::list_recent(
        &mut *tx,
        session_id,
        config.watch_party.status_event_limit,
    )
    .await
    .map_err(storage("snapshot"))?;

    let messages = PartyMessageRepo::list_recent(
        &mut *tx,
        session_id,
        config.watch_party.status_message_limit,
    )
    .await
    .map_err(storage("snapshot"))?;

    tx.commit().await.map_err(storage("snapshot"))?;

    let participants = participants
        .iter()
        .map(|p| ParticipantPresence::new(p, session.host_user_id, server_time))
        .collect();

    Ok(StatusSnapshot {
        latest_event_id: events.last().map(|e| e.id),
        session: SessionView::new(session, viewer, &config.public_base_url),
        participants,
        events,
        messages,
        server_time,
    })
}
