//! Watch party constants, join codes, content references, chat bodies, and
//! presence helpers.

use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of a join code.
pub const CODE_LENGTH: usize = 8;

/// Symbols a join code is drawn from. 36^8 codes make collisions negligible.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many fresh codes to try before giving up on a collision streak.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Maximum chat message length, in characters, before markup escaping.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Default number of recent events returned by the status endpoint.
pub const DEFAULT_STATUS_EVENT_LIMIT: i64 = 50;

/// Default number of recent messages returned by the status endpoint.
pub const DEFAULT_STATUS_MESSAGE_LIMIT: i64 = 20;

/// Default session lifetime in hours.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Participants idle for longer than this are shown as away.
pub const PRESENCE_AWAY_SECS: i64 = 30;

/// How often the expired-session sweep runs by default (in seconds).
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

// ---------------------------------------------------------------------------
// Join codes
// ---------------------------------------------------------------------------

/// Draw a new join code uniformly from [`CODE_ALPHABET`].
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize user input into the stored code form (trimmed, upper-case).
///
/// Returns `None` for anything that cannot be a code, so callers can answer
/// "not found" without touching the database.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    let well_formed = code.len() == CODE_LENGTH
        && code.bytes().all(|b| CODE_ALPHABET.contains(&b));
    well_formed.then_some(code)
}

/// Build the shareable join URL for a code.
pub fn share_url(public_base_url: &str, code: &str) -> String {
    format!(
        "{}/watch-party/join/{code}",
        public_base_url.trim_end_matches('/')
    )
}

// ---------------------------------------------------------------------------
// Content references
// ---------------------------------------------------------------------------

/// Known content type names, as stored in `watch_party_sessions.content_type`.
pub mod content_types {
    /// A single asset (film, special).
    pub const MOVIE: &str = "movie";
    /// Episodic content; a reference must name an episode.
    pub const SERIES: &str = "series";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            content_types::MOVIE => Ok(Self::Movie),
            content_types::SERIES => Ok(Self::Series),
            other => Err(format!(
                "Invalid content_type '{other}'. Must be one of: {}, {}",
                content_types::MOVIE,
                content_types::SERIES
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => content_types::MOVIE,
            Self::Series => content_types::SERIES,
        }
    }
}

/// The piece of media a watch party is watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    pub content_id: DbId,
    pub content_type: ContentType,
    pub episode_id: Option<DbId>,
}

impl ContentRef {
    /// Check the reference is well-formed. Existence is the catalog's call.
    pub fn validate(&self) -> Result<(), String> {
        if self.content_id <= 0 {
            return Err(format!(
                "content_id must be positive, got {}",
                self.content_id
            ));
        }
        match (self.content_type, self.episode_id) {
            (ContentType::Movie, Some(_)) => {
                Err("episode_id is only allowed for series content".to_string())
            }
            (ContentType::Series, None) => {
                Err("episode_id is required for series content".to_string())
            }
            (ContentType::Series, Some(id)) if id <= 0 => {
                Err(format!("episode_id must be positive, got {id}"))
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat messages
// ---------------------------------------------------------------------------

/// Validate a chat body and return the form to persist.
///
/// The body must fit in [`MAX_MESSAGE_CHARS`] characters as received, must
/// be non-empty once trimmed, and is markup-escaped so later HTML
/// rendering cannot be hijacked by message content.
pub fn prepare_message_body(raw: &str) -> Result<String, String> {
    // The bound applies to the body as sent, surrounding whitespace included.
    let chars = raw.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(format!(
            "Message body must be at most {MAX_MESSAGE_CHARS} characters, got {chars}"
        ));
    }
    let body = raw.trim();
    if body.is_empty() {
        return Err("Message body must not be empty".to_string());
    }
    Ok(escape_markup(body))
}

/// Escape the characters HTML treats as markup.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Lifetime and presence
// ---------------------------------------------------------------------------

/// Expiry timestamp for a session created at `now`. A TTL of zero or less
/// means the session never expires.
pub fn expiry_from(now: Timestamp, ttl_hours: i64) -> Option<Timestamp> {
    (ttl_hours > 0).then(|| now + Duration::hours(ttl_hours))
}

/// Returns `true` once `expires_at` has passed.
pub fn is_expired(expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    expires_at.is_some_and(|at| at <= now)
}

/// Whole seconds since a participant's last heartbeat, never negative.
pub fn idle_seconds(last_seen_at: Timestamp, now: Timestamp) -> i64 {
    (now - last_seen_at).num_seconds().max(0)
}

/// Returns `true` if a participant idle for `idle_secs` should show as away.
pub fn is_away(idle_secs: i64) -> bool {
    idle_secs > PRESENCE_AWAY_SECS
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
