//! Key material newtypes
//!
//! Each type can only be built through a validating constructor, so holding
//! one means the length and format checks already passed.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::b64;
use crate::prelude::*;

/// Length of an uncompressed SEC1 P-256 point
pub const UNCOMPRESSED_POINT_LEN: usize = 65;
/// SEC1 tag of an uncompressed point
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;
pub const AUTH_SECRET_LEN: usize = 16;
pub const SALT_LEN: usize = 16;

/// Check length and prefix of an uncompressed P-256 point
pub fn check_uncompressed_point(
	field: &'static str,
	bytes: &[u8],
) -> WpResult<[u8; UNCOMPRESSED_POINT_LEN]> {
	let point: [u8; UNCOMPRESSED_POINT_LEN] = bytes.try_into().map_err(|_| {
		Error::validation(
			field,
			format!("expected {} bytes, got {}", UNCOMPRESSED_POINT_LEN, bytes.len()),
		)
	})?;
	if point[0] != UNCOMPRESSED_POINT_TAG {
		return Err(Error::validation(
			field,
			format!("expected uncompressed point prefix 0x04, got {:#04x}", point[0]),
		));
	}
	Ok(point)
}

/// Recipient's (user agent's) public key, the subscription's `p256dh` value
#[derive(Clone, PartialEq, Eq)]
pub struct RecipientPublicKey([u8; UNCOMPRESSED_POINT_LEN]);

impl RecipientPublicKey {
	pub fn from_bytes(bytes: &[u8]) -> WpResult<Self> {
		check_uncompressed_point("p256dh", bytes).map(Self)
	}

	pub fn from_base64(input: &str) -> WpResult<Self> {
		Self::from_bytes(&b64::decode_lenient("p256dh", input)?)
	}

	pub fn as_bytes(&self) -> &[u8; UNCOMPRESSED_POINT_LEN] {
		&self.0
	}

	pub fn to_base64(&self) -> String {
		b64::encode(self.0)
	}
}

impl fmt::Debug for RecipientPublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RecipientPublicKey").field(&self.to_base64()).finish()
	}
}

/// Authentication secret shared with the user agent, the subscription's `auth` value
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AuthSecret([u8; AUTH_SECRET_LEN]);

impl AuthSecret {
	pub fn from_bytes(bytes: &[u8]) -> WpResult<Self> {
		let secret: [u8; AUTH_SECRET_LEN] = bytes.try_into().map_err(|_| {
			Error::validation(
				"auth",
				format!("expected {} bytes, got {}", AUTH_SECRET_LEN, bytes.len()),
			)
		})?;
		Ok(Self(secret))
	}

	pub fn from_base64(input: &str) -> WpResult<Self> {
		let mut bytes = b64::decode_lenient("auth", input)?;
		let res = Self::from_bytes(&bytes);
		bytes.zeroize();
		res
	}

	pub fn as_bytes(&self) -> &[u8; AUTH_SECRET_LEN] {
		&self.0
	}
}

impl fmt::Debug for AuthSecret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("AuthSecret(..)")
	}
}

/// Per-message key derivation salt
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
	pub fn new(bytes: [u8; SALT_LEN]) -> Self {
		Self(bytes)
	}

	pub fn from_bytes(bytes: &[u8]) -> WpResult<Self> {
		let salt: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
			Error::validation("salt", format!("expected {} bytes, got {}", SALT_LEN, bytes.len()))
		})?;
		Ok(Self(salt))
	}

	pub fn from_base64(input: &str) -> WpResult<Self> {
		Self::from_bytes(&b64::decode_lenient("salt", input)?)
	}

	pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
		&self.0
	}

	pub fn to_base64(&self) -> String {
		b64::encode(self.0)
	}
}

impl fmt::Debug for Salt {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Salt").field(&self.to_base64()).finish()
	}
}


// vim: ts=4
