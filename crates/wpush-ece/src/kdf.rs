//! Content key and nonce derivation
//!
//! This is the two-stage HMAC chain of the `aesgcm` scheme, not a generic
//! HKDF call. Each step is one HMAC-SHA-256 over labelled input:
//!
//! ```text
//! PRK_key = HMAC(auth, ecdh_secret)
//! IKM     = HMAC(PRK_key, "Content-Encoding: auth\0" 0x01)
//! PRK     = HMAC(salt, IKM)
//! CEK     = HMAC(PRK, "Content-Encoding: aesgcm\0" context 0x01)[..16]
//! NONCE   = HMAC(PRK, "Content-Encoding: nonce\0" context 0x01)[..12]
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::prelude::*;
use wpush_types::keys::{AuthSecret, Salt, UNCOMPRESSED_POINT_LEN};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const KEY_LEN: usize = 16;
pub(crate) const NONCE_LEN: usize = 12;

const AUTH_INFO: &[u8] = b"Content-Encoding: auth\0";
const CEK_INFO: &[u8] = b"Content-Encoding: aesgcm\0";
const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";
const CURVE_LABEL: &[u8] = b"P-256\0";
const INFO_COUNTER: &[u8] = &[0x01];

#[allow(clippy::cast_possible_truncation)]
const POINT_LEN_PREFIX: [u8; 2] = (UNCOMPRESSED_POINT_LEN as u16).to_be_bytes();

pub(crate) const CONTEXT_LEN: usize = CURVE_LABEL.len() + 2 * (2 + UNCOMPRESSED_POINT_LEN);

/// Symmetric material for a single record
pub(crate) struct ContentKeys {
	pub cek: Zeroizing<[u8; KEY_LEN]>,
	pub nonce: Zeroizing<[u8; NONCE_LEN]>,
}

/// HMAC-SHA-256 over the concatenation of `parts`
pub(crate) fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> WpResult<Zeroizing<[u8; 32]>> {
	let mut mac = HmacSha256::new_from_slice(key)
		.map_err(|e| Error::Encryption(format!("HMAC key rejected: {}", e)))?;
	for part in parts {
		mac.update(part);
	}

	let mut out = Zeroizing::new([0u8; 32]);
	out.copy_from_slice(&mac.finalize().into_bytes());
	Ok(out)
}

/// Context buffer binding the derived keys to both public keys.
///
/// `"P-256\0" || len(recipient) || recipient || len(sender) || sender`,
/// lengths as big-endian u16.
pub(crate) fn context(
	recipient_public: &[u8; UNCOMPRESSED_POINT_LEN],
	sender_public: &[u8; UNCOMPRESSED_POINT_LEN],
) -> Vec<u8> {
	let mut ctx = Vec::with_capacity(CONTEXT_LEN);
	ctx.extend_from_slice(CURVE_LABEL);
	ctx.extend_from_slice(&POINT_LEN_PREFIX);
	ctx.extend_from_slice(recipient_public);
	ctx.extend_from_slice(&POINT_LEN_PREFIX);
	ctx.extend_from_slice(sender_public);
	ctx
}

/// Derive the content encryption key and nonce from an ECDH secret.
///
/// Both sides call this with the same arguments: the sender with its
/// ephemeral key as `sender_public`, the user agent with the key received
/// in the `Crypto-Key: dh=` parameter.
pub(crate) fn derive(
	ecdh_secret: &[u8],
	auth: &AuthSecret,
	salt: &Salt,
	recipient_public: &[u8; UNCOMPRESSED_POINT_LEN],
	sender_public: &[u8; UNCOMPRESSED_POINT_LEN],
) -> WpResult<ContentKeys> {
	let prk_key = hmac_sha256(auth.as_bytes(), &[ecdh_secret])?;
	let ikm = hmac_sha256(&prk_key[..], &[AUTH_INFO, INFO_COUNTER])?;
	let prk = hmac_sha256(salt.as_bytes(), &[&ikm[..]])?;

	let ctx = context(recipient_public, sender_public);

	let cek_full = hmac_sha256(&prk[..], &[CEK_INFO, &ctx[..], INFO_COUNTER])?;
	let nonce_full = hmac_sha256(&prk[..], &[NONCE_INFO, &ctx[..], INFO_COUNTER])?;

	let mut cek = Zeroizing::new([0u8; KEY_LEN]);
	cek.copy_from_slice(&cek_full[..KEY_LEN]);
	let mut nonce = Zeroizing::new([0u8; NONCE_LEN]);
	nonce.copy_from_slice(&nonce_full[..NONCE_LEN]);

	trace!("derived aesgcm content key and nonce");
	Ok(ContentKeys { cek, nonce })
}


// vim: ts=4
