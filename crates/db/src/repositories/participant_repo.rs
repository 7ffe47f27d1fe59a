//! Repository for the `watch_party_participants` table.

use sqlx::PgExecutor;
use watchparty_core::types::DbId;

use crate::models::watch_party::Participant;

/// Column list for `watch_party_participants` queries.
const COLUMNS: &str = "id, session_id, user_id, joined_at, last_seen_at, is_active";

/// Provides membership and heartbeat operations.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Enroll a user as an active participant.
    ///
    /// Idempotent: an active member keeps its original `joined_at`, a member
    /// who previously left is reactivated with a fresh one. Either way the
    /// heartbeat is refreshed and exactly one row exists per (session, user).
    pub async fn join<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Participant, sqlx::Error> {
        let query = format!(
            "INSERT INTO watch_party_participants (session_id, user_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_watch_party_participants_session_user \
             DO UPDATE SET \
                 joined_at = CASE WHEN watch_party_participants.is_active \
                                  THEN watch_party_participants.joined_at \
                                  ELSE NOW() END, \
                 last_seen_at = NOW(), \
                 is_active = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    /// Refresh an active participant's heartbeat.
    ///
    /// Returns `None` if the user is not an active member of the session.
    pub async fn touch<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "UPDATE watch_party_participants SET last_seen_at = NOW() \
             WHERE session_id = $1 AND user_id = $2 AND is_active = true \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Mark a participant inactive. Returns `true` if an active row changed.
    pub async fn deactivate<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE watch_party_participants SET is_active = false \
             WHERE session_id = $1 AND user_id = $2 AND is_active = true",
        )
        .bind(session_id)
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a user's active membership in a session.
    pub async fn find_active<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_party_participants \
             WHERE session_id = $1 AND user_id = $2 AND is_active = true"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Active participants in join order.
    pub async fn list_active<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_party_participants \
             WHERE session_id = $1 AND is_active = true \
             ORDER BY joined_at ASC, id ASC"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(session_id)
            .fetch_all(executor)
            .await
    }

    /// Number of active participants in a session.
    pub async fn count_active<'e, E: PgExecutor<'e>>(
        executor: E,
        session_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM watch_party_participants \
             WHERE session_id = $1 AND is_active = true",
        )
        .bind(session_id)
        .fetch_one(executor)
        .await
    }
}
