//! VAPID identity tokens (RFC 8292)
//!
//! A push service accepts a message only if the sender proves which
//! application it is. The proof is a short-lived ES256 JWT whose audience
//! is the push service origin, signed with the application's long-lived
//! P-256 key.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod keys;
pub mod token;

mod prelude;

pub use keys::VapidKeys;
pub use token::{issue, verify, VapidClaims, DEFAULT_VALIDITY, MAX_VALIDITY};

// vim: ts=4
