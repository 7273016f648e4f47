//! Push delivery
//!
//! Sends a [`RequestDescriptor`] to the push service (RFC 8030) and maps the
//! response onto what the caller should do with the subscription. Nothing
//! here retries; [`PushResult::TemporaryError`] tells the caller it may.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::StatusCode;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::prelude::*;
use crate::request::{RequestDescriptor, WebPushBuilder};
use crate::subscription::Subscription;

/// Result of sending a push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushResult {
	/// Successfully sent
	Success,
	/// Subscription is no longer valid (should be deleted)
	SubscriptionGone,
	/// Temporary error (can retry)
	TemporaryError(String),
	/// Permanent error (don't retry)
	PermanentError(String),
}

/// Something that can deliver a built request
#[async_trait]
pub trait PushTransport: Send + Sync {
	async fn send(&self, request: RequestDescriptor) -> PushResult;
}

/// Map a push service response status onto a [`PushResult`]
pub fn classify_response(status: StatusCode, body: &str) -> PushResult {
	if status.is_success() {
		PushResult::Success
	} else if status == StatusCode::GONE || status == StatusCode::NOT_FOUND {
		// 404/410 = subscription no longer valid
		PushResult::SubscriptionGone
	} else if status == StatusCode::PAYLOAD_TOO_LARGE {
		PushResult::PermanentError(format!("HTTP {}: payload too large", status))
	} else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
		PushResult::TemporaryError(format!("HTTP {}", status))
	} else {
		PushResult::PermanentError(format!("HTTP {}: {}", status, body))
	}
}

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// hyper based transport, HTTP/1.1 and HTTP/2 over rustls
///
/// Build once and reuse; the client pools connections per push service.
#[derive(Clone)]
pub struct HyperTransport {
	client: HttpsClient,
}

impl HyperTransport {
	pub fn new() -> WpResult<Self> {
		let connector = HttpsConnectorBuilder::new()
			.with_native_roots()
			.map_err(|e| Error::Transport(format!("TLS error: {}", e)))?
			.https_only()
			.enable_http1()
			.enable_http2()
			.build();

		let client = Client::builder(TokioExecutor::new()).build(connector);
		Ok(Self { client })
	}
}

impl std::fmt::Debug for HyperTransport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HyperTransport").finish_non_exhaustive()
	}
}

pub(crate) fn to_hyper_request(
	request: RequestDescriptor,
) -> WpResult<hyper::Request<Full<Bytes>>> {
	let mut builder = hyper::Request::builder().method(request.method).uri(&request.endpoint);
	for (name, value) in request.headers {
		builder = builder.header(name, value);
	}

	builder
		.body(Full::new(Bytes::from(request.body)))
		.map_err(|e| Error::validation("endpoint", format!("cannot build request: {}", e)))
}

#[async_trait]
impl PushTransport for HyperTransport {
	async fn send(&self, request: RequestDescriptor) -> PushResult {
		let request = match to_hyper_request(request) {
			Ok(req) => req,
			Err(e) => return PushResult::PermanentError(format!("Request build error: {}", e)),
		};

		match self.client.request(request).await {
			Ok(response) => {
				let status = response.status();
				let body = if status.is_client_error() {
					response.into_body().collect().await.ok().map(|b| b.to_bytes())
				} else {
					None
				};
				let body_str =
					body.as_ref().and_then(|b| std::str::from_utf8(b).ok()).unwrap_or("");
				classify_response(status, body_str)
			}
			Err(e) => PushResult::TemporaryError(format!("Network error: {}", e)),
		}
	}
}

/// Outcome counts of a batch send
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SendSummary {
	pub sent: usize,
	/// Endpoints the push service no longer knows; the caller should delete them
	pub gone: Vec<String>,
	pub temporary_errors: usize,
	pub permanent_errors: usize,
}

/// Builder and transport together
#[derive(Debug)]
pub struct WebPushClient<T> {
	builder: WebPushBuilder,
	transport: T,
}

impl WebPushClient<HyperTransport> {
	/// Client with the default hyper transport
	pub fn connect(builder: WebPushBuilder) -> WpResult<Self> {
		Ok(Self::new(builder, HyperTransport::new()?))
	}
}

impl<T: PushTransport> WebPushClient<T> {
	pub fn new(builder: WebPushBuilder, transport: T) -> Self {
		Self { builder, transport }
	}

	pub fn builder(&self) -> &WebPushBuilder {
		&self.builder
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Build and send one notification
	pub async fn send(&self, subscription: &Subscription, payload: &[u8]) -> PushResult {
		let request = match self.builder.build(subscription, payload) {
			Ok(req) => req,
			Err(e) => return PushResult::PermanentError(format!("Request build error: {}", e)),
		};
		self.transport.send(request).await
	}

	/// Send the same payload to every subscription
	///
	/// A failure for one subscription never stops the batch.
	pub async fn send_all(&self, subscriptions: &[Subscription], payload: &[u8]) -> SendSummary {
		let mut summary = SendSummary::default();

		for (idx, subscription) in subscriptions.iter().enumerate() {
			match self.send(subscription, payload).await {
				PushResult::Success => {
					summary.sent += 1;
					debug!(subscription = idx, "Push notification sent successfully");
				}
				PushResult::SubscriptionGone => {
					info!(subscription = idx, "Push subscription is gone");
					summary.gone.push(subscription.endpoint.clone());
				}
				PushResult::TemporaryError(e) => {
					summary.temporary_errors += 1;
					warn!(subscription = idx, error = %e, "Temporary push notification error");
				}
				PushResult::PermanentError(e) => {
					summary.permanent_errors += 1;
					error!(subscription = idx, error = %e, "Permanent push notification error");
				}
			}
		}

		summary
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_classify_response() {
		assert_eq!(classify_response(StatusCode::CREATED, ""), PushResult::Success);
		assert_eq!(classify_response(StatusCode::GONE, ""), PushResult::SubscriptionGone);
		assert_eq!(classify_response(StatusCode::NOT_FOUND, ""), PushResult::SubscriptionGone);
		assert!(matches!(
			classify_response(StatusCode::TOO_MANY_REQUESTS, ""),
			PushResult::TemporaryError(_)
		));
		assert!(matches!(
			classify_response(StatusCode::BAD_GATEWAY, ""),
			PushResult::TemporaryError(_)
		));
		assert!(matches!(
			classify_response(StatusCode::PAYLOAD_TOO_LARGE, ""),
			PushResult::PermanentError(_)
		));
		assert_eq!(
			classify_response(StatusCode::UNAUTHORIZED, "bad jwt"),
			PushResult::PermanentError("HTTP 401 Unauthorized: bad jwt".into())
		);
	}

	#[test]
	fn test_to_hyper_request_keeps_headers_and_body() {
		let descriptor = RequestDescriptor {
			method: hyper::Method::POST,
			endpoint: "https://push.example.com/send/1".into(),
			headers: vec![("TTL", "60".into()), ("Content-Encoding", "aesgcm".into())],
			body: vec![1, 2, 3],
		};

		let req = to_hyper_request(descriptor).unwrap();
		assert_eq!(req.method(), hyper::Method::POST);
		assert_eq!(req.uri(), "https://push.example.com/send/1");
		assert_eq!(req.headers()["ttl"], "60");
		assert_eq!(req.headers()["content-encoding"], "aesgcm");
	}

	#[test]
	fn test_to_hyper_request_rejects_bad_header_value() {
		let descriptor = RequestDescriptor {
			method: hyper::Method::POST,
			endpoint: "https://push.example.com/send/1".into(),
			headers: vec![("Topic", "bad\nvalue".into())],
			body: Vec::new(),
		};
		assert!(to_hyper_request(descriptor).is_err());
	}
}

// vim: ts=4
