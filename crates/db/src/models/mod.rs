//! Row models and request DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching database rows
//! - `Deserialize` request DTOs accepted by the API
//! - Create DTOs passed to repositories for inserts

pub mod watch_party;
