//! Bearer token verification. Tokens are issued by the platform's identity
//! service; this crate only needs to validate them.

pub mod jwt;
