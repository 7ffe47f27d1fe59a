//! Watch party session, participant, event, and message models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use watchparty_core::playback::PlaybackState;
use watchparty_core::types::{DbId, Timestamp};
use watchparty_core::watch_party::ContentRef;

// ---------------------------------------------------------------------------
// WatchPartySession
// ---------------------------------------------------------------------------

/// A row from the `watch_party_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WatchPartySession {
    pub id: DbId,
    pub code: String,
    pub host_user_id: DbId,
    pub content_id: DbId,
    pub content_type: String,
    pub episode_id: Option<DbId>,
    pub display_name: String,
    pub position_seconds: f64,
    pub is_playing: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl WatchPartySession {
    pub fn playback(&self) -> PlaybackState {
        PlaybackState {
            position_seconds: self.position_seconds,
            is_playing: self.is_playing,
        }
    }

    pub fn is_host(&self, user_id: DbId) -> bool {
        self.host_user_id == user_id
    }
}

/// Insert DTO for a new session. The code is generated by the caller so a
/// collision can be retried with a fresh one.
#[derive(Debug, Clone)]
pub struct CreateWatchPartySession {
    pub code: String,
    pub host_user_id: DbId,
    pub content: ContentRef,
    pub display_name: String,
    pub expires_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// A row from the `watch_party_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub id: DbId,
    pub session_id: DbId,
    pub user_id: DbId,
    pub joined_at: Timestamp,
    pub last_seen_at: Timestamp,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// PartyEvent
// ---------------------------------------------------------------------------

/// A row from the `watch_party_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartyEvent {
    pub id: DbId,
    pub session_id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub position_seconds: f64,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// PartyMessage
// ---------------------------------------------------------------------------

/// A row from the `watch_party_messages` table. `body` is stored escaped.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartyMessage {
    pub id: DbId,
    pub session_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /watch-party/sessions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWatchPartyRequest {
    pub content_id: DbId,
    pub content_type: String,
    pub episode_id: Option<DbId>,
    /// Falls back to the catalog title when omitted.
    #[validate(length(min = 1, max = 200))]
    pub display_name: Option<String>,
}

/// Body of `POST /watch-party/join`.
#[derive(Debug, Deserialize)]
pub struct JoinWatchPartyRequest {
    pub code: String,
}

/// Body of `POST /watch-party/sessions/{id}/events`.
#[derive(Debug, Deserialize)]
pub struct SubmitEventRequest {
    pub kind: String,
    pub position_seconds: f64,
}

/// Body of `POST /watch-party/sessions/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}
