//! Web Push request building and delivery
//!
//! Ties the two cryptographic halves together:
//!
//! - payload encryption for the subscription (`aesgcm`, see [`wpush_ece`])
//! - VAPID authentication of the application server (RFC 8292, see [`wpush_vapid`])
//!
//! [`WebPushBuilder`] turns a subscription and a payload into a
//! [`RequestDescriptor`] that a transport sends unmodified.
//! [`WebPushClient`] pairs a builder with a [`PushTransport`] and classifies
//! the push service's answer.
//!
//! # Example
//!
//! ```no_run
//! use wpush::{PushConfig, Subscription, VapidKeys, WebPushBuilder};
//!
//! # fn main() -> wpush::WpResult<()> {
//! let keys = VapidKeys::from_private_key_base64("iYEqf9yNLL4J4At2VNAOuUb1XGLA4-7VWNX_2TMnijc")?;
//! let builder = WebPushBuilder::new(keys, PushConfig::new("mailto:ops@example.com"))?;
//!
//! let subscription = Subscription::from_json(r#"{
//!     "endpoint": "https://push.example.com/send/abc",
//!     "keys": { "p256dh": "BP2q...", "auth": "T47w..." }
//! }"#)?;
//! let request = builder.build(&subscription, br#"{"title":"Hello"}"#)?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod request;
pub mod send;
pub mod subscription;

mod prelude;

pub use config::{PushConfig, Urgency};
pub use request::{RequestDescriptor, WebPushBuilder};
pub use send::{HyperTransport, PushResult, PushTransport, SendSummary, WebPushClient};
pub use subscription::{Subscription, SubscriptionKeys};

pub use wpush_types::error::{Error, WpResult};
pub use wpush_vapid::VapidKeys;

// vim: ts=4
