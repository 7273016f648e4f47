//! Shared types for the wpush crates.
//!
//! Holds the error type every crate returns, the validated key material
//! newtypes that cross crate boundaries, and the base64 helpers used for
//! everything that travels in headers or subscription JSON.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod b64;
pub mod error;
pub mod keys;
pub mod prelude;

// vim: ts=4
