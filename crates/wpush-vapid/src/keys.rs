//! VAPID key pair
//!
//! Keys are exchanged in the format browsers and other Web Push libraries
//! use: the private key as the raw 32 byte P-256 scalar and the public key
//! as the 65 byte uncompressed point, both base64url.

use std::fmt;

use p256::elliptic_curve::rand_core::OsRng;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::SecretKey;
use zeroize::Zeroizing;

use crate::prelude::*;
use wpush_types::b64;
use wpush_types::keys::{check_uncompressed_point, UNCOMPRESSED_POINT_LEN};

const PRIVATE_KEY_LEN: usize = 32;

/// Long-lived application server key pair
///
/// Read-only after construction; share it by reference between threads.
#[derive(Clone)]
pub struct VapidKeys {
	secret_key: SecretKey,
	public_key: [u8; UNCOMPRESSED_POINT_LEN],
}

impl VapidKeys {
	/// Generate a fresh key pair
	pub fn generate() -> Self {
		Self::from_secret_key(SecretKey::random(&mut OsRng))
	}

	pub fn from_secret_key(secret_key: SecretKey) -> Self {
		let mut public_key = [0u8; UNCOMPRESSED_POINT_LEN];
		public_key.copy_from_slice(secret_key.public_key().to_encoded_point(false).as_bytes());
		Self { secret_key, public_key }
	}

	/// Load from the raw private scalar, deriving the public key
	pub fn from_private_key_base64(private_key: &str) -> WpResult<Self> {
		let bytes = Zeroizing::new(b64::decode_lenient("private_key", private_key)?);
		if bytes.len() != PRIVATE_KEY_LEN {
			return Err(Error::validation(
				"private_key",
				format!("expected {} bytes, got {}", PRIVATE_KEY_LEN, bytes.len()),
			));
		}
		let secret_key = SecretKey::from_bytes(bytes.as_slice().into())
			.map_err(|_| Error::validation("private_key", "not a valid P-256 scalar"))?;

		Ok(Self::from_secret_key(secret_key))
	}

	/// Load a key pair, checking that the public key belongs to the private key
	pub fn from_base64(public_key: &str, private_key: &str) -> WpResult<Self> {
		let public = check_uncompressed_point(
			"public_key",
			&b64::decode_lenient("public_key", public_key)?,
		)?;
		let keys = Self::from_private_key_base64(private_key)?;
		if keys.public_key != public {
			return Err(Error::validation("public_key", "does not match the private key"));
		}

		Ok(keys)
	}

	/// Uncompressed public point, the browser's `applicationServerKey`
	pub fn public_key_bytes(&self) -> &[u8; UNCOMPRESSED_POINT_LEN] {
		&self.public_key
	}

	pub fn public_key_base64url(&self) -> String {
		b64::encode(self.public_key)
	}

	pub fn private_key_base64url(&self) -> Zeroizing<String> {
		Zeroizing::new(b64::encode(self.secret_key.to_bytes()))
	}

	pub(crate) fn secret_key(&self) -> &SecretKey {
		&self.secret_key
	}
}

impl fmt::Debug for VapidKeys {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("VapidKeys")
			.field("public_key", &self.public_key_base64url())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// Key pair from a published Web Push test fixture
	const PUBLIC: &str =
		"BBtmHfzr6l3f5jCowx5CR6cpnF9hVTNCZBOeaayk2KmdYGJuno2HhY4DFaBl7DdvsRuLgvUa9k0I8vRWg5ovYdM";
	const PRIVATE: &str = "iYEqf9yNLL4J4At2VNAOuUb1XGLA4-7VWNX_2TMnijc";

	#[test]
	fn test_generate_produces_raw_formats() {
		let keys = VapidKeys::generate();

		let public = b64::decode_lenient("k", &keys.public_key_base64url()).unwrap();
		assert_eq!(public.len(), 65);
		assert_eq!(public[0], 0x04);

		let private = b64::decode_lenient("k", &keys.private_key_base64url()).unwrap();
		assert_eq!(private.len(), 32);
	}

	#[test]
	fn test_base64_roundtrip() {
		let keys = VapidKeys::generate();
		let loaded =
			VapidKeys::from_base64(&keys.public_key_base64url(), &keys.private_key_base64url())
				.unwrap();
		assert_eq!(loaded.public_key_bytes(), keys.public_key_bytes());
	}

	#[test]
	fn test_derives_public_from_private() {
		let keys = VapidKeys::from_private_key_base64(PRIVATE).unwrap();
		assert_eq!(keys.public_key_base64url(), PUBLIC);
		assert!(VapidKeys::from_base64(PUBLIC, PRIVATE).is_ok());
	}

	#[test]
	fn test_rejects_mismatched_public_key() {
		let other = VapidKeys::generate();
		let err = VapidKeys::from_base64(&other.public_key_base64url(), PRIVATE).unwrap_err();
		assert_eq!(err.field(), Some("public_key"));
	}

	#[test]
	fn test_rejects_bad_private_key() {
		let err = VapidKeys::from_private_key_base64("AAAA").unwrap_err();
		assert_eq!(err.field(), Some("private_key"));

		// zero is not a valid scalar
		let zero = b64::encode([0u8; 32]);
		let err = VapidKeys::from_private_key_base64(&zero).unwrap_err();
		assert_eq!(err.field(), Some("private_key"));
	}

	#[test]
	fn test_debug_hides_private_key() {
		let keys = VapidKeys::from_private_key_base64(PRIVATE).unwrap();
		let dbg = format!("{:?}", keys);
		assert!(dbg.contains(PUBLIC));
		assert!(!dbg.contains(PRIVATE));
	}
}

// vim: ts=4
