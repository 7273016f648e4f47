//! Web Push message encryption (`aesgcm` content encoding)
//!
//! Implements the sender half of the legacy Web Push encryption scheme used
//! with `Content-Encoding: aesgcm`, plus the user agent half for testing:
//!
//! - ephemeral P-256 ECDH against the subscription's `p256dh` key
//! - a double HMAC-SHA-256 chain keyed by the subscription's `auth` secret and
//!   a fresh 16 byte salt, bound to both public keys through a context buffer
//! - a single AES-128-GCM record with a 2 byte padding-length header
//!
//! Every call generates its own ephemeral key and salt; nothing is cached.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod decrypt;
mod encrypt;
mod kdf;
mod prelude;

pub use decrypt::decrypt;
pub use encrypt::{encrypt, EncryptedMessage};

/// Content encoding label carried in the `Content-Encoding` header
pub const CONTENT_ENCODING: &str = "aesgcm";

/// Length of the padding-length header prepended to the plaintext
pub const PADDING_HEADER_LEN: usize = 2;
/// AES-GCM authentication tag length
pub const TAG_LEN: usize = 16;
/// Largest body push services accept in a single record
pub const MAX_RECORD_LEN: usize = 4096;
/// Largest plaintext that still fits in one record
pub const MAX_PLAINTEXT_LEN: usize = MAX_RECORD_LEN - PADDING_HEADER_LEN - TAG_LEN;

// vim: ts=4
