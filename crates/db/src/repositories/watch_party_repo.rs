//! Repository for the `watch_party_sessions` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use watchparty_core::playback::PlaybackState;
use watchparty_core::types::DbId;

use crate::models::watch_party::{CreateWatchPartySession, WatchPartySession};
use crate::repositories::participant_repo::ParticipantRepo;

/// Column list for `watch_party_sessions` queries.
const COLUMNS: &str = "id, code, host_user_id, content_id, content_type, episode_id, \
                       display_name, position_seconds, is_playing, \
                       created_at, updated_at, expires_at";

/// Provides session lifecycle queries and playback state updates.
pub struct WatchPartyRepo;

impl WatchPartyRepo {
    /// Insert a session and enroll its host as the first active participant.
    ///
    /// Both rows commit together. A duplicate join code surfaces as a unique
    /// violation on `uq_watch_party_sessions_code`, leaving nothing behind.
    pub async fn create_with_host(
        pool: &PgPool,
        input: &CreateWatchPartySession,
    ) -> Result<WatchPartySession, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO watch_party_sessions \
                (code, host_user_id, content_id, content_type, episode_id, display_name, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(&input.code)
            .bind(input.host_user_id)
            .bind(input.content.content_id)
            .bind(input.content.content_type.as_str())
            .bind(input.content.episode_id)
            .bind(&input.display_name)
            .bind(input.expires_at)
            .fetch_one(&mut *tx)
            .await?;

        ParticipantRepo::join(&mut *tx, session.id, input.host_user_id).await?;

        tx.commit().await?;
        Ok(session)
    }

    /// Find a session by its internal id.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<WatchPartySession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM watch_party_sessions WHERE id = $1");
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a session by join code, case-insensitively.
    pub async fn find_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<WatchPartySession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM watch_party_sessions WHERE UPPER(code) = UPPER($1)");
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Read a session and take its row lock for the rest of the transaction.
    ///
    /// Every playback write goes through this lock, so concurrent submissions
    /// for one session serialize while other sessions proceed untouched.
    /// The lock does not cover the key, so [`Self::hold_by_id`] holders are
    /// not blocked by it.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<WatchPartySession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_party_sessions WHERE id = $1 FOR NO KEY UPDATE"
        );
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Read a session and keep it from being deleted until the transaction
    /// ends.
    ///
    /// Membership writes (join, heartbeat, leave, chat) take this first, so a
    /// concurrent host teardown either finishes before them and they see
    /// `None`, or waits until they commit.
    pub async fn hold_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<WatchPartySession>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM watch_party_sessions WHERE id = $1 FOR KEY SHARE");
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite the canonical playback state. Call with the row locked.
    pub async fn update_playback(
        conn: &mut PgConnection,
        id: DbId,
        state: PlaybackState,
    ) -> Result<WatchPartySession, sqlx::Error> {
        let query = format!(
            "UPDATE watch_party_sessions \
             SET position_seconds = $2, is_playing = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(id)
            .bind(state.position_seconds)
            .bind(state.is_playing)
            .fetch_one(conn)
            .await
    }

    /// Delete a session. Participants, events, and messages cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watch_party_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a session only if it has expired by the database clock.
    pub async fn delete_if_expired(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM watch_party_sessions \
             WHERE id = $1 AND expires_at IS NOT NULL AND expires_at <= NOW()",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every expired session, returning how many were removed.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM watch_party_sessions \
             WHERE expires_at IS NOT NULL AND expires_at <= NOW()",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Live sessions the user is an active participant of, most recently
    /// updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WatchPartySession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM watch_party_sessions s \
             WHERE EXISTS ( \
                 SELECT 1 FROM watch_party_participants p \
                 WHERE p.session_id = s.id AND p.user_id = $1 AND p.is_active = true \
             ) \
             AND (s.expires_at IS NULL OR s.expires_at > NOW()) \
             ORDER BY s.updated_at DESC, s.id DESC"
        );
        sqlx::query_as::<_, WatchPartySession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
