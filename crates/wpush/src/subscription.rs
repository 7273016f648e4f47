//! Browser push subscription

use serde::{Deserialize, Serialize};
use url::Url;

use crate::prelude::*;
use wpush_types::keys::{AuthSecret, RecipientPublicKey};

/// A `PushSubscription` as serialized by the browser's Push API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
	/// Push service URL for this user agent
	pub endpoint: String,
	/// Expiration time (Unix timestamp in ms, from browser)
	#[serde(rename = "expirationTime", default, skip_serializing_if = "Option::is_none")]
	pub expiration_time: Option<i64>,
	pub keys: SubscriptionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
	/// P-256 public key, uncompressed point (base64)
	pub p256dh: String,
	/// Auth secret, 16 bytes (base64)
	pub auth: String,
}

impl Subscription {
	pub fn new(
		endpoint: impl Into<String>,
		p256dh: impl Into<String>,
		auth: impl Into<String>,
	) -> WpResult<Self> {
		let subscription = Self {
			endpoint: endpoint.into(),
			expiration_time: None,
			keys: SubscriptionKeys { p256dh: p256dh.into(), auth: auth.into() },
		};
		subscription.validate()?;
		Ok(subscription)
	}

	/// Parse and validate the browser's subscription JSON
	pub fn from_json(json: &str) -> WpResult<Self> {
		let subscription: Self = serde_json::from_str(json)?;
		subscription.validate()?;
		Ok(subscription)
	}

	/// Format checks only; whether the push service still knows the
	/// subscription is found out on delivery.
	pub fn validate(&self) -> WpResult<()> {
		self.endpoint_url()?;
		self.recipient_key()?;
		self.auth_secret()?;
		Ok(())
	}

	pub fn endpoint_url(&self) -> WpResult<Url> {
		let url = Url::parse(&self.endpoint)
			.map_err(|e| Error::validation("endpoint", format!("not an absolute URL: {}", e)))?;
		// push services (RFC 8030) are only reachable over TLS
		if url.scheme() != "https" {
			return Err(Error::validation("endpoint", format!("unsupported scheme {}", url.scheme())));
		}
		if url.host_str().is_none() {
			return Err(Error::validation("endpoint", "URL has no host"));
		}
		Ok(url)
	}

	pub fn recipient_key(&self) -> WpResult<RecipientPublicKey> {
		RecipientPublicKey::from_base64(&self.keys.p256dh)
	}

	pub fn auth_secret(&self) -> WpResult<AuthSecret> {
		AuthSecret::from_base64(&self.keys.auth)
	}
}


// vim: ts=4
