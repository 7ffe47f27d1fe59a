//! Domain logic for watch party sessions.
//!
//! Zero internal dependencies: constants, validation, the playback state
//! machine, and the catalog port live here so the repository layer, the
//! HTTP layer, and background tasks all agree on the same rules.

pub mod catalog;
pub mod error;
pub mod playback;
pub mod types;
pub mod watch_party;
