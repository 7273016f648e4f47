//! VAPID JWT issuing and verification
//!
//! Tokens are `base64url(header) "." base64url(claims) "." base64url(sig)`
//! with header `{"typ":"JWT","alg":"ES256"}` and claims serialized in the
//! fixed order `aud`, `exp`, `sub`. The signature is the raw 64 byte
//! `r || s` ECDSA P-256 / SHA-256 signature.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use p256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use p256::pkcs8::{EncodePrivateKey, LineEnding};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::keys::VapidKeys;
use crate::prelude::*;
use wpush_types::b64;

/// Token lifetime used when the caller has no preference
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(12 * 3600);
/// Push services reject tokens that live longer than a day
pub const MAX_VALIDITY: Duration = Duration::from_secs(24 * 3600);

const MAILTO: &str = "mailto:";

/// VAPID JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VapidClaims {
	/// Origin of the push service
	pub aud: String,
	/// Expiration, seconds since the Unix epoch
	pub exp: u64,
	/// Contact for the application server (`mailto:` or URL)
	pub sub: String,
}

fn unix_now() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_secs()
}

/// Subject must start with `mailto:` or be an absolute URL
pub fn validate_subject(subject: &str) -> WpResult<()> {
	if subject.is_empty() {
		return Err(Error::validation("subject", "must not be empty"));
	}
	if subject.starts_with(MAILTO) || Url::parse(subject).is_ok() {
		return Ok(());
	}

	Err(Error::validation("subject", "must be a mailto: address or an absolute URL"))
}

/// Audience must be an absolute URL with a host
pub fn validate_audience(audience: &str) -> WpResult<()> {
	match Url::parse(audience) {
		Ok(url) if url.has_host() => Ok(()),
		Ok(_) => Err(Error::validation("audience", "URL has no host")),
		Err(e) => Err(Error::validation("audience", format!("not an absolute URL: {}", e))),
	}
}

pub fn validate_validity(validity: Duration) -> WpResult<()> {
	if validity.as_secs() == 0 {
		return Err(Error::validation("validity", "must be at least one second"));
	}
	if validity > MAX_VALIDITY {
		return Err(Error::validation(
			"validity",
			format!("{}s exceeds the {}s maximum", validity.as_secs(), MAX_VALIDITY.as_secs()),
		));
	}
	Ok(())
}

/// Issue a VAPID token for `audience`, valid for `validity` from now.
///
/// All inputs are validated before anything is signed.
pub fn issue(
	keys: &VapidKeys,
	subject: &str,
	audience: &str,
	validity: Duration,
) -> WpResult<String> {
	validate_subject(subject)?;
	validate_audience(audience)?;
	validate_validity(validity)?;

	let claims = VapidClaims {
		aud: audience.to_string(),
		exp: unix_now() + validity.as_secs(),
		sub: subject.to_string(),
	};
	let token = sign(keys, &claims)?;

	debug!(audience = %audience, exp = claims.exp, "issued VAPID token");
	Ok(token)
}

fn sign(keys: &VapidKeys, claims: &VapidClaims) -> WpResult<String> {
	let pem = keys
		.secret_key()
		.to_pkcs8_pem(LineEnding::LF)
		.map_err(|e| Error::Signing(format!("cannot encode private key: {}", e)))?;
	let encoding_key = EncodingKey::from_ec_pem(pem.as_bytes())
		.map_err(|e| Error::Signing(format!("invalid VAPID private key: {}", e)))?;

	encode(&Header::new(Algorithm::ES256), claims, &encoding_key)
		.map_err(|e| Error::Signing(format!("JWT encoding failed: {}", e)))
}

/// Verify a VAPID token the way a push service does.
///
/// Checks the ES256 signature against `public_key` (uncompressed point),
/// then the audience and the expiration.
pub fn verify(token: &str, public_key: &[u8], audience: &str) -> WpResult<VapidClaims> {
	let (signing_input, signature) = token
		.rsplit_once('.')
		.ok_or_else(|| Error::validation("token", "expected three segments"))?;
	let (header, claims) = signing_input
		.split_once('.')
		.filter(|(_, claims)| !claims.contains('.'))
		.ok_or_else(|| Error::validation("token", "expected three segments"))?;

	let header: Header = serde_json::from_slice(&b64::decode_lenient("token", header)?)?;
	if header.alg != Algorithm::ES256 {
		return Err(Error::VerificationFailed(format!("unexpected algorithm {:?}", header.alg)));
	}

	let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
		.map_err(|_| Error::validation("public_key", "not a P-256 public key"))?;
	let signature = Signature::from_slice(&b64::decode_lenient("token", signature)?)
		.map_err(|_| Error::VerificationFailed("malformed signature".into()))?;
	verifying_key
		.verify(signing_input.as_bytes(), &signature)
		.map_err(|_| Error::VerificationFailed("signature mismatch".into()))?;

	let claims: VapidClaims = serde_json::from_slice(&b64::decode_lenient("token", claims)?)?;
	if claims.aud != audience {
		return Err(Error::VerificationFailed(format!(
			"audience {} does not match {}",
			claims.aud, audience
		)));
	}
	if claims.exp <= unix_now() {
		return Err(Error::VerificationFailed("token expired".into()));
	}

	Ok(claims)
}


// vim: ts=4
