//! Session creation, joining by code, leaving, and discovery.

use chrono::Utc;
use validator::Validate;
use watchparty_core::error::CoreError;
use watchparty_core::types::DbId;
use watchparty_core::watch_party::{
    expiry_from, generate_code, is_expired, normalize_code, ContentRef, ContentType,
    MAX_CODE_ATTEMPTS,
};
use watchparty_db::models::watch_party::{
    CreateWatchPartyRequest, CreateWatchPartySession, WatchPartySession,
};
use watchparty_db::repositories::{ParticipantRepo, WatchPartyRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::watch_party::{
    snapshot, LeaveOutcome, LeaveResult, SessionPreview, SessionView, StatusSnapshot,
    SESSION_ENTITY,
};

/// Constraint guarding join code uniqueness.
const CODE_CONSTRAINT: &str = "uq_watch_party_sessions_code";

fn is_code_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(CODE_CONSTRAINT)
        }
        _ => false,
    }
}

/// Resolve a user-supplied code to a session, treating malformed input the
/// same as an unknown code.
async fn find_by_raw_code(state: &AppState, raw_code: &str) -> AppResult<WatchPartySession> {
    let not_found = || CoreError::code_not_found(SESSION_ENTITY, raw_code.trim());

    let code = normalize_code(raw_code).ok_or_else(not_found)?;
    let session = WatchPartyRepo::find_by_code(&state.pool, &code)
        .await
        .map_err(AppError::storage("find_by_code", None))?
        .ok_or_else(not_found)?;
    Ok(session)
}

/// Validate a create request into a content reference and optional name.
fn parse_create_request(
    input: &CreateWatchPartyRequest,
) -> Result<(ContentRef, Option<String>), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let content = ContentRef {
        content_id: input.content_id,
        content_type: ContentType::parse(&input.content_type).map_err(CoreError::Validation)?,
        episode_id: input.episode_id,
    };
    content.validate().map_err(CoreError::Validation)?;

    let display_name = match input.display_name.as_deref().map(str::trim) {
        Some("") => {
            return Err(CoreError::Validation(
                "display_name must not be blank".to_string(),
            ))
        }
        other => other.map(str::to_string),
    };

    Ok((content, display_name))
}

/// Create a session hosted by `host_user_id`.
///
/// The content reference is checked against the catalog before anything is
/// written. Code collisions are retried with a fresh code up to
/// [`MAX_CODE_ATTEMPTS`] times.
pub async fn create_session(
    state: &AppState,
    host_user_id: DbId,
    input: &CreateWatchPartyRequest,
) -> AppResult<SessionView> {
    let (content, display_name) = parse_create_request(input)?;

    let entry = state
        .catalog
        .resolve(&content)
        .await?
        .ok_or(CoreError::not_found("Content", content.content_id))?;

    let mut create = CreateWatchPartySession {
        code: String::new(),
        host_user_id,
        content,
        display_name: display_name.unwrap_or(entry.title),
        expires_at: expiry_from(Utc::now(), state.config.watch_party.ttl_hours),
    };

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        create.code = generate_code();
        match WatchPartyRepo::create_with_host(&state.pool, &create).await {
            Ok(session) => {
                tracing::info!(
                    session_id = session.id,
                    host_user_id,
                    code = %session.code,
                    content_id = session.content_id,
                    "Watch party created"
                );
                return Ok(SessionView::new(
                    session,
                    host_user_id,
                    &state.config.public_base_url,
                ));
            }
            Err(err) if is_code_collision(&err) => {
                tracing::debug!(attempt, "Join code collision, retrying");
            }
            Err(err) => return Err(AppError::storage("create_session", None)(err)),
        }
    }

    Err(CoreError::Conflict(format!(
        "Could not allocate a unique join code after {MAX_CODE_ATTEMPTS} attempts"
    ))
    .into())
}

/// Join a session by code and return the merged snapshot.
///
/// An expired session is deleted on the spot and reported as `Expired`.
/// Re-joining reactivates the caller's existing participant row.
pub async fn join_session(
    state: &AppState,
    user_id: DbId,
    raw_code: &str,
) -> AppResult<StatusSnapshot> {
    let found = find_by_raw_code(state, raw_code).await?;
    let session_id = found.id;
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = state.pool.begin().await.map_err(storage("join_session"))?;

    // The host may have ended the party since the code lookup.
    let session = WatchPartyRepo::hold_by_id(&mut tx, session_id)
        .await
        .map_err(storage("join_session"))?
        .ok_or_else(|| CoreError::code_not_found(SESSION_ENTITY, &found.code))?;

    if is_expired(session.expires_at, Utc::now()) {
        // Release the hold before deleting through another connection.
        drop(tx);
        let deleted = WatchPartyRepo::delete_if_expired(&state.pool, session_id)
            .await
            .map_err(storage("join_session"))?;
        if deleted {
            tracing::info!(session_id, code = %session.code, "Expired watch party removed on join");
        }
        return Err(CoreError::Expired(format!(
            "Watch party {} has expired",
            session.code
        ))
        .into());
    }

    ParticipantRepo::join(&mut *tx, session_id, user_id)
        .await
        .map_err(storage("join_session"))?;
    tx.commit().await.map_err(storage("join_session"))?;

    tracing::info!(session_id, user_id, "Participant joined watch party");

    snapshot::read(&state.pool, &state.config, session_id, user_id).await
}

/// Leave a session.
///
/// The host leaving ends the party: the session and everything under it is
/// deleted. Anyone else is only marked inactive, keeping their history.
pub async fn leave_session(
    state: &AppState,
    session_id: DbId,
    user_id: DbId,
) -> AppResult<LeaveResult> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let session = WatchPartyRepo::find_by_id(&state.pool, session_id)
        .await
        .map_err(storage("leave_session"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    let outcome = if session.is_host(user_id) {
        end_session(state, session_id).await?;
        tracing::info!(session_id, user_id, "Host left, watch party ended");
        LeaveOutcome::Ended
    } else {
        depart(state, session_id, user_id).await?;
        tracing::info!(session_id, user_id, "Participant left watch party");
        LeaveOutcome::Left
    };

    Ok(LeaveResult {
        session_id,
        outcome,
    })
}

/// Host teardown. Cascades to participants, events, and messages.
async fn end_session(state: &AppState, session_id: DbId) -> AppResult<()> {
    let deleted = WatchPartyRepo::delete(&state.pool, session_id)
        .await
        .map_err(AppError::storage("end_session", Some(session_id)))?;
    if !deleted {
        return Err(CoreError::not_found(SESSION_ENTITY, session_id).into());
    }
    Ok(())
}

/// Non-host departure. The participant row is kept for attribution.
async fn depart(state: &AppState, session_id: DbId, user_id: DbId) -> AppResult<()> {
    let storage = |operation: &'static str| AppError::storage(operation, Some(session_id));

    let mut tx = state.pool.begin().await.map_err(storage("leave_session"))?;

    WatchPartyRepo::hold_by_id(&mut tx, session_id)
        .await
        .map_err(storage("leave_session"))?
        .ok_or(CoreError::not_found(SESSION_ENTITY, session_id))?;

    let changed = ParticipantRepo::deactivate(&mut *tx, session_id, user_id)
        .await
        .map_err(storage("leave_session"))?;
    if !changed {
        return Err(CoreError::Forbidden(
            "You are not part of this watch party".to_string(),
        )
        .into());
    }

    tx.commit().await.map_err(storage("leave_session"))?;
    Ok(())
}

/// Summarize a session for someone holding its code, without joining.
pub async fn preview_session(state: &AppState, raw_code: &str) -> AppResult<SessionPreview> {
    let session = find_by_raw_code(state, raw_code).await?;

    let participant_count = ParticipantRepo::count_active(&state.pool, session.id)
        .await
        .map_err(AppError::storage("preview_session", Some(session.id)))?;

    Ok(SessionPreview {
        is_expired: is_expired(session.expires_at, Utc::now()),
        code: session.code,
        display_name: session.display_name,
        content_id: session.content_id,
        content_type: session.content_type,
        episode_id: session.episode_id,
        participant_count,
        is_playing: session.is_playing,
    })
}

/// Live sessions the user currently belongs to, newest activity first.
pub async fn list_sessions(state: &AppState, user_id: DbId) -> AppResult<Vec<SessionView>> {
    let sessions = WatchPartyRepo::list_for_user(&state.pool, user_id)
        .await
        .map_err(AppError::storage("list_sessions", None))?;

    Ok(sessions
        .into_iter()
        .map(|s| SessionView::new(s, user_id, &state.config.public_base_url))
        .collect())
}
