//! Repository for the append-only `watch_party_events` log.

use sqlx::{PgConnection, PgExecutor};
use watchparty_core::playback::EventKind;
use watchparty_core::types::DbId;

use crate::models::watch_party::PartyEvent;

/// Column list for `watch_party_events` queries.
const COLUMNS: &str = "id, session_id, user_id, kind, position_seconds, created_at";

pub struct PartyEventRepo;

impl PartyEventRepo {
    /// Append an accepted event. Call inside the transaction that holds the
    /// session row lock so the log order matches the state update order.
    pub async fn append(
        conn: &mut PgConnection,
        session_id: DbId,
        user_id: DbId,
        kind: EventKind,
        position_seconds: f64,
    ) -> Result<PartyEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO watch_party_events (session_id, user_id, kind, position_seconds) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PartyEvent>(&query)
            .bind(session_id)
            .bind(user_id)
            .bind(kind.as_str())
            .bind(position_seconds)
            .fetch_one(conn)
            .await
    }

    /// The `limit` most recent events, returned oldest first.
    pub async fn list_recent<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        limit: i64,
    ) -> Result<Vec<PartyEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT {COLUMNS} FROM watch_party_events \
                 WHERE session_id = $1 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2 \
             ) recent \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PartyEvent>(&query)
            .bind(session_id)
            .bind(limit)
            .fetch_all(executor)
            .await
    }
}
