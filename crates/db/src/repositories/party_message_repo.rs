//! Repository for the append-only `watch_party_messages` log.

use sqlx::PgExecutor;
use watchparty_core::types::DbId;

use crate::models::watch_party::PartyMessage;

/// Column list for `watch_party_messages` queries.
const COLUMNS: &str = "id, session_id, user_id, body, created_at";

pub struct PartyMessageRepo;

impl PartyMessageRepo {
    /// Insert a message if, and only if, the sender is an active participant
    /// at insert time.
    ///
    /// Returns `None` when the membership check fails. `body` must already be
    /// validated and escaped.
    pub async fn create_if_member<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        user_id: DbId,
        body: &str,
    ) -> Result<Option<PartyMessage>, sqlx::Error> {
        let query = format!(
            "INSERT INTO watch_party_messages (session_id, user_id, body) \
             SELECT $1, $2, $3 \
             WHERE EXISTS ( \
                 SELECT 1 FROM watch_party_participants \
                 WHERE session_id = $1 AND user_id = $2 AND is_active = true \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PartyMessage>(&query)
            .bind(session_id)
            .bind(user_id)
            .bind(body)
            .fetch_optional(executor)
            .await
    }

    /// The `limit` most recent messages, returned oldest first.
    pub async fn list_recent<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        limit: i64,
    ) -> Result<Vec<PartyMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT {COLUMNS} FROM watch_party_messages \
                 WHERE session_id = $1 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2 \
             ) recent \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PartyMessage>(&query)
            .bind(session_id)
            .bind(limit)
            .fetch_all(executor)
            .await
    }
}
