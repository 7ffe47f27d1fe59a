//! HTTP handlers. Each handler extracts, delegates to a service, and wraps
//! the result in the response envelope.

pub mod watch_party;
