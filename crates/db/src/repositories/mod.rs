//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that must run inside a caller's transaction take
//! `&mut PgConnection`; read paths are generic over [`sqlx::PgExecutor`] so
//! they work against either the pool or an open transaction.

pub mod participant_repo;
pub mod party_event_repo;
pub mod party_message_repo;
pub mod watch_party_repo;

pub use participant_repo::ParticipantRepo;
pub use party_event_repo::PartyEventRepo;
pub use party_message_repo::PartyMessageRepo;
pub use watch_party_repo::WatchPartyRepo;
