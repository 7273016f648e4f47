//! Sender configuration
//!
//! Everything here can be loaded from the operator's config file. Key
//! material is deliberately not part of it; [`crate::VapidKeys`] is passed
//! to the builder separately.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use wpush_vapid::token::{validate_subject, validate_validity};

/// Four weeks, the longest time push services keep an undelivered message
pub const DEFAULT_TTL: u32 = 2_419_200;
pub const DEFAULT_TOKEN_VALIDITY_SECS: u64 = 12 * 3600;
pub const MAX_TOPIC_LEN: usize = 32;

fn default_ttl() -> u32 {
	DEFAULT_TTL
}

fn default_token_validity_secs() -> u64 {
	DEFAULT_TOKEN_VALIDITY_SECS
}

/// Delivery priority hint (RFC 8030 section 5.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
	VeryLow,
	Low,
	Normal,
	High,
}

impl Urgency {
	pub fn as_str(self) -> &'static str {
		match self {
			Urgency::VeryLow => "very-low",
			Urgency::Low => "low",
			Urgency::Normal => "normal",
			Urgency::High => "high",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushConfig {
	/// VAPID `sub` claim: `mailto:` address or URL of the operator
	pub subject: String,
	/// Seconds the push service should keep an undelivered message
	#[serde(default = "default_ttl")]
	pub ttl: u32,
	/// Lifetime of each VAPID token
	#[serde(default = "default_token_validity_secs")]
	pub token_validity_secs: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub urgency: Option<Urgency>,
	/// Replaces a pending message with the same topic (RFC 8030 section 5.4)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub topic: Option<String>,
}

impl PushConfig {
	pub fn new(subject: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			ttl: DEFAULT_TTL,
			token_validity_secs: DEFAULT_TOKEN_VALIDITY_SECS,
			urgency: None,
			topic: None,
		}
	}

	pub fn token_validity(&self) -> Duration {
		Duration::from_secs(self.token_validity_secs)
	}

	pub fn validate(&self) -> WpResult<()> {
		validate_subject(&self.subject)?;
		validate_validity(self.token_validity())?;

		if let Some(topic) = &self.topic {
			if topic.is_empty() || topic.len() > MAX_TOPIC_LEN {
				return Err(Error::validation(
					"topic",
					format!("must be 1 to {} characters", MAX_TOPIC_LEN),
				));
			}
			if !topic.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
				return Err(Error::validation("topic", "must use the URL-safe base64 alphabet"));
			}
		}

		Ok(())
	}
}


// vim: ts=4
