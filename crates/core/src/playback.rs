//! Host transport events and the playback state machine.
//!
//! ```text
//!         play           pause
//!  [Paused] ----------> [Playing]
//!     ^                     |
//!     |        pause        |
//!     +---------------------+
//!  seek / buffering: self-loop on either state, position only
//! ```
//!
//! The state machine has no terminal state; it lives as long as the
//! session row does.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Known event kind names, as stored in `watch_party_events.kind`.
pub mod event_kinds {
    pub const PLAY: &str = "play";
    pub const PAUSE: &str = "pause";
    pub const SEEK: &str = "seek";
    pub const BUFFERING: &str = "buffering";
}

/// The set of all valid event kinds.
pub const VALID_EVENT_KINDS: &[&str] = &[
    event_kinds::PLAY,
    event_kinds::PAUSE,
    event_kinds::SEEK,
    event_kinds::BUFFERING,
];

/// A host-issued transport action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Play,
    Pause,
    Seek,
    Buffering,
}

impl EventKind {
    /// Parse an event kind. Matching is exact: `"PLAY"` or `" play"` are
    /// rejected rather than coerced.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            event_kinds::PLAY => Ok(Self::Play),
            event_kinds::PAUSE => Ok(Self::Pause),
            event_kinds::SEEK => Ok(Self::Seek),
            event_kinds::BUFFERING => Ok(Self::Buffering),
            other => Err(format!(
                "Invalid event kind '{other}'. Must be one of: {}",
                VALID_EVENT_KINDS.join(", ")
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => event_kinds::PLAY,
            Self::Pause => event_kinds::PAUSE,
            Self::Seek => event_kinds::SEEK,
            Self::Buffering => event_kinds::BUFFERING,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a playback offset reported by the host player.
pub fn validate_position(position_seconds: f64) -> Result<(), String> {
    if !position_seconds.is_finite() {
        return Err("position_seconds must be a finite number".to_string());
    }
    if position_seconds < 0.0 {
        return Err(format!(
            "position_seconds must not be negative, got {position_seconds}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    Paused,
    Playing,
}

/// Canonical playback state of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub position_seconds: f64,
    pub is_playing: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            position_seconds: 0.0,
            is_playing: false,
        }
    }
}

impl PlaybackState {
    pub fn phase(&self) -> PlaybackPhase {
        if self.is_playing {
            PlaybackPhase::Playing
        } else {
            PlaybackPhase::Paused
        }
    }

    /// Apply an accepted host event.
    ///
    /// The host is the ground truth for its own player clock, so the position
    /// is taken from the event verbatim. Only `play` and `pause` touch the
    /// playing flag.
    pub fn apply(self, kind: EventKind, position_seconds: f64) -> Self {
        let is_playing = match kind {
            EventKind::Play => true,
            EventKind::Pause => false,
            EventKind::Seek | EventKind::Buffering => self.is_playing,
        };
        Self {
            position_seconds,
            is_playing,
        }
    }
}

/// Extrapolate the canonical position to `now` for a snapshot taken at
/// `snapshot_at`.
///
/// Participants use this between polls for smooth local playback. A paused
/// snapshot never moves, and clock skew that puts `now` before the snapshot
/// never moves it backwards.
pub fn projected_position(state: PlaybackState, snapshot_at: Timestamp, now: Timestamp) -> f64 {
    if !state.is_playing {
        return state.position_seconds;
    }
    let elapsed_ms = (now - snapshot_at).num_milliseconds().max(0);
    state.position_seconds + elapsed_ms as f64 / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
