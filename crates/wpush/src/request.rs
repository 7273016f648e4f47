//! Request building
//!
//! Encrypts the payload for the subscription, signs a VAPID token for the
//! push service origin, and lays out the headers of the legacy `aesgcm`
//! Web Push wire format:
//!
//! ```text
//! POST <endpoint>
//! TTL: <seconds>
//! Content-Type: application/octet-stream
//! Content-Encoding: aesgcm
//! Encryption: salt=<salt>
//! Crypto-Key: dh=<ephemeral key>;p256ecdsa=<VAPID public key>
//! Authorization: WebPush <jwt>
//! ```

use hyper::Method;
use url::Url;

use crate::config::PushConfig;
use crate::prelude::*;
use crate::subscription::Subscription;
use wpush_vapid::VapidKeys;

pub const CONTENT_TYPE: &str = "application/octet-stream";
pub const AUTH_SCHEME: &str = "WebPush";

/// Everything the transport needs, sent unmodified
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
	pub method: Method,
	pub endpoint: String,
	pub headers: Vec<(&'static str, String)>,
	pub body: Vec<u8>,
}

impl RequestDescriptor {
	/// Header value by case-insensitive name
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}
}

/// VAPID audience for an endpoint: scheme and host, no path or port
pub fn audience_for(endpoint: &Url) -> WpResult<String> {
	let host = endpoint
		.host_str()
		.ok_or_else(|| Error::validation("endpoint", "URL has no host"))?;
	Ok(format!("{}://{}", endpoint.scheme(), host))
}

/// Builds push requests for one application server identity
///
/// Holds only the long-lived VAPID keys and the configuration; every
/// [`WebPushBuilder::build`] call creates its own ephemeral material.
#[derive(Debug, Clone)]
pub struct WebPushBuilder {
	keys: VapidKeys,
	config: PushConfig,
}

impl WebPushBuilder {
	pub fn new(keys: VapidKeys, config: PushConfig) -> WpResult<Self> {
		config.validate()?;
		Ok(Self { keys, config })
	}

	pub fn keys(&self) -> &VapidKeys {
		&self.keys
	}

	pub fn config(&self) -> &PushConfig {
		&self.config
	}

	/// Encrypt `payload` for `subscription` and assemble the request
	pub fn build(
		&self,
		subscription: &Subscription,
		payload: &[u8],
	) -> WpResult<RequestDescriptor> {
		if payload.is_empty() {
			return Err(Error::validation("payload", "must not be empty"));
		}
		let endpoint = subscription.endpoint_url()?;
		let recipient = subscription.recipient_key()?;
		let auth = subscription.auth_secret()?;

		let encrypted = wpush_ece::encrypt(payload, &recipient, &auth)?;

		let audience = audience_for(&endpoint)?;
		let token = wpush_vapid::issue(
			&self.keys,
			&self.config.subject,
			&audience,
			self.config.token_validity(),
		)?;

		let mut headers = vec![
			("TTL", self.config.ttl.to_string()),
			("Content-Type", CONTENT_TYPE.to_string()),
			("Content-Encoding", encrypted.content_encoding().to_string()),
			("Encryption", format!("salt={}", encrypted.salt_base64())),
			(
				"Crypto-Key",
				format!(
					"dh={};p256ecdsa={}",
					encrypted.server_public_key_base64(),
					self.keys.public_key_base64url()
				),
			),
			("Authorization", format!("{} {}", AUTH_SCHEME, token)),
		];
		if let Some(urgency) = self.config.urgency {
			headers.push(("Urgency", urgency.as_str().to_string()));
		}
		if let Some(topic) = &self.config.topic {
			headers.push(("Topic", topic.clone()));
		}

		debug!(audience = %audience, body_len = encrypted.body().len(), "built push request");

		Ok(RequestDescriptor {
			method: Method::POST,
			endpoint: subscription.endpoint.clone(),
			headers,
			body: encrypted.into_body(),
		})
	}
}


// vim: ts=4
