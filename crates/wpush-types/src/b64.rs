//! Base64 helpers
//!
//! Everything this workspace emits is URL-safe base64 without padding.
//! Inputs coming from browsers or operators are decoded leniently: both the
//! standard and the URL-safe alphabet are accepted, with or without `=`
//! padding.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::prelude::*;

const LENIENT: GeneralPurposeConfig =
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Encode bytes as unpadded base64url
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
	URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64 in either alphabet, padding optional.
///
/// One input uses one alphabet; mixing `-`/`_` with `+`/`/` is rejected.
/// Failures are reported as validation errors on `field`.
pub fn decode_lenient(field: &'static str, input: &str) -> WpResult<Vec<u8>> {
	let trimmed = input.trim();
	if trimmed.trim_end_matches('=').is_empty() {
		return Err(Error::validation(field, "must not be empty"));
	}

	URL_SAFE_LENIENT
		.decode(trimmed)
		.or_else(|_| STANDARD_LENIENT.decode(trimmed))
		.map_err(|e| Error::validation(field, format!("invalid base64: {}", e)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_encode_is_url_safe_unpadded() {
		assert_eq!(encode([0xfb, 0xff]), "-_8");
		assert_eq!(encode(b"a"), "YQ");
	}

	#[test]
	fn test_decode_accepts_both_alphabets() {
		assert_eq!(decode_lenient("k", "-_8").unwrap(), vec![0xfb, 0xff]);
		assert_eq!(decode_lenient("k", "+/8=").unwrap(), vec![0xfb, 0xff]);
		assert_eq!(decode_lenient("k", "YQ==").unwrap(), b"a".to_vec());
		assert_eq!(decode_lenient("k", "YQ").unwrap(), b"a".to_vec());
	}

	#[test]
	fn test_decode_rejects_garbage() {
		let err = decode_lenient("p256dh", "not base64!").unwrap_err();
		assert_eq!(err.field(), Some("p256dh"));

		let err = decode_lenient("auth", "  ").unwrap_err();
		assert_eq!(err.field(), Some("auth"));
	}

	#[test]
	fn test_decode_rejects_mixed_alphabets() {
		assert_eq!(decode_lenient("k", "-_8-").unwrap(), vec![0xfb, 0xff, 0x3e]);
		assert_eq!(decode_lenient("k", "+/8+").unwrap(), vec![0xfb, 0xff, 0x3e]);

		let err = decode_lenient("p256dh", "+_8-").unwrap_err();
		assert_eq!(err.field(), Some("p256dh"));
	}
}

// vim: ts=4
