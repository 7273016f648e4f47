//! User agent side: open a record produced by [`crate::encrypt`]
//!
//! Push senders never need this. It exists so the sending pipeline can be
//! checked end to end without a browser.

use aes_gcm::{
	aead::{Aead, KeyInit},
	Aes128Gcm, Nonce,
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::kdf;
use crate::prelude::*;
use crate::{PADDING_HEADER_LEN, TAG_LEN};
use wpush_types::keys::{check_uncompressed_point, AuthSecret, Salt, UNCOMPRESSED_POINT_LEN};

/// Decrypt an `aesgcm` body with the subscription's private key.
///
/// `server_public_key` is the sender's ephemeral key (`Crypto-Key: dh=`).
/// An authentication failure yields [`Error::DecryptionFailed`]; a record
/// that authenticates but is malformed yields [`Error::InvalidRecord`].
pub fn decrypt(
	body: &[u8],
	recipient_secret: &SecretKey,
	auth: &AuthSecret,
	salt: &Salt,
	server_public_key: &[u8],
) -> WpResult<Vec<u8>> {
	let server_public = check_uncompressed_point("dh", server_public_key)?;
	let server_point = PublicKey::from_sec1_bytes(&server_public)
		.map_err(|_| Error::validation("dh", "not a point on P-256"))?;
	if body.len() < PADDING_HEADER_LEN + TAG_LEN {
		return Err(Error::InvalidRecord(format!(
			"body of {} bytes is shorter than header and tag",
			body.len()
		)));
	}

	let recipient_public: [u8; UNCOMPRESSED_POINT_LEN] = recipient_secret
		.public_key()
		.to_encoded_point(false)
		.as_bytes()
		.try_into()
		.map_err(|_| Error::KeyAgreement("unexpected recipient key encoding".into()))?;
	let shared =
		p256::ecdh::diffie_hellman(recipient_secret.to_nonzero_scalar(), server_point.as_affine());

	let keys = kdf::derive(
		shared.raw_secret_bytes(),
		auth,
		salt,
		&recipient_public,
		&server_public,
	)?;

	let cipher = Aes128Gcm::new_from_slice(&keys.cek[..])
		.map_err(|e| Error::Encryption(format!("content key rejected: {}", e)))?;
	let padded = Zeroizing::new(
		cipher
			.decrypt(Nonce::from_slice(&keys.nonce[..]), body)
			.map_err(|_| Error::DecryptionFailed)?,
	);

	strip_padding(&padded)
}

/// Remove the big-endian padding-length header and the zero padding after it
fn strip_padding(padded: &[u8]) -> WpResult<Vec<u8>> {
	let (header, rest) = padded
		.split_first_chunk::<PADDING_HEADER_LEN>()
		.ok_or_else(|| Error::InvalidRecord("missing padding header".into()))?;
	let pad_len = usize::from(u16::from_be_bytes(*header));

	let Some((padding, plaintext)) = rest.split_at_checked(pad_len) else {
		return Err(Error::InvalidRecord(format!(
			"padding length {} exceeds record of {} bytes",
			pad_len,
			rest.len()
		)));
	};
	if padding.iter().any(|&b| b != 0) {
		return Err(Error::InvalidRecord("non-zero padding".into()));
	}

	Ok(plaintext.to_vec())
}


// vim: ts=4
