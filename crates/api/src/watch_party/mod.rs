//! Watch party services and their response shapes.
//!
//! - [`lifecycle`]: create, join, leave, preview, list
//! - [`gateway`]: the host-only playback write path and the polling read path
//! - [`chat`]: message append
//! - [`snapshot`]: the consistent merged read model shared by join and status

pub mod chat;
pub mod gateway;
pub mod lifecycle;
pub mod snapshot;

use serde::Serialize;
use watchparty_core::playback::PlaybackPhase;
use watchparty_core::types::{DbId, Timestamp};
use watchparty_core::watch_party::{idle_seconds, is_away, share_url};
use watchparty_db::models::watch_party::{
    Participant, PartyEvent, PartyMessage, WatchPartySession,
};

/// Entity name used in `NotFound` errors.
pub(crate) const SESSION_ENTITY: &str = "Watch party";

/// A session as seen by one particular user.
#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: WatchPartySession,
    pub phase: PlaybackPhase,
    /// Whether the viewing user is the host.
    pub is_host: bool,
    pub share_url: String,
}

impl SessionView {
    pub fn new(session: WatchPartySession, viewer: DbId, public_base_url: &str) -> Self {
        Self {
            phase: session.playback().phase(),
            is_host: session.is_host(viewer),
            share_url: share_url(public_base_url, &session.code),
            session,
        }
    }
}

/// An active participant annotated for presence indicators.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantPresence {
    pub user_id: DbId,
    pub joined_at: Timestamp,
    pub last_seen_at: Timestamp,
    pub is_host: bool,
    pub idle_seconds: i64,
    pub is_away: bool,
}

impl ParticipantPresence {
    pub fn new(participant: &Participant, host_user_id: DbId, now: Timestamp) -> Self {
        let idle = idle_seconds(participant.last_seen_at, now);
        Self {
            user_id: participant.user_id,
            joined_at: participant.joined_at,
            last_seen_at: participant.last_seen_at,
            is_host: participant.user_id == host_user_id,
            idle_seconds: idle,
            is_away: is_away(idle),
        }
    }
}

/// The merged read model returned by join and status.
#[derive(Debug, Serialize)]
pub struct StatusSnapshot {
    pub session: SessionView,
    /// Active participants in join order.
    pub participants: Vec<ParticipantPresence>,
    /// Recent events, oldest first.
    pub events: Vec<PartyEvent>,
    /// Recent messages, oldest first.
    pub messages: Vec<PartyMessage>,
    /// Highest event id in the snapshot. Clients dedupe replays against it.
    pub latest_event_id: Option<DbId>,
    /// Database clock at the snapshot, for client-side extrapolation.
    pub server_time: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveOutcome {
    /// The host left and the session was torn down.
    Ended,
    /// A participant left; the session continues.
    Left,
}

#[derive(Debug, Serialize)]
pub struct LeaveResult {
    pub session_id: DbId,
    pub outcome: LeaveOutcome,
}

/// Response to an accepted host event.
#[derive(Debug, Serialize)]
pub struct EventAccepted {
    pub event: PartyEvent,
    pub session: SessionView,
}

/// What a prospective participant may see before joining.
#[derive(Debug, Serialize)]
pub struct SessionPreview {
    pub code: String,
    pub display_name: String,
    pub content_id: DbId,
    pub content_type: String,
    pub episode_id: Option<DbId>,
    pub participant_count: i64,
    pub is_playing: bool,
    pub is_expired: bool,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn participant(user_id: DbId, idle_secs: i64, now: Timestamp) -> Participant {
        Participant {
            id: user_id,
            session_id: 1,
            user_id,
            joined_at: now - Duration::minutes(10),
            last_seen_at: now - Duration::seconds(idle_secs),
            is_active: true,
        }
    }

    #[test]
    fn test_presence_marks_host_and_away() {
        let now = Utc::now();

        let host = ParticipantPresence::new(&participant(1, 5, now), 1, now);
        assert!(host.is_host);
        assert_eq!(host.idle_seconds, 5);
        assert!(!host.is_away);

        let guest = ParticipantPresence::new(&participant(2, 90, now), 1, now);
        assert!(!guest.is_host);
        assert!(guest.is_away);
    }

    #[test]
    fn test_leave_outcome_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(LeaveOutcome::Ended).unwrap(),
            serde_json::json!("ended")
        );
        assert_eq!(
            serde_json::to_value(LeaveOutcome::Left).unwrap(),
            serde_json::json!("left")
        );
    }
}
