//! Sender side: encrypt a payload for one subscription

use aes_gcm::{
	aead::{Aead, KeyInit},
	Aes128Gcm, Nonce,
};
use p256::ecdh::EphemeralSecret;
use p256::elliptic_curve::rand_core::{OsRng, RngCore};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::PublicKey;
use zeroize::Zeroizing;

use crate::kdf;
use crate::prelude::*;
use crate::{CONTENT_ENCODING, MAX_PLAINTEXT_LEN, PADDING_HEADER_LEN};
use wpush_types::b64;
use wpush_types::keys::{
	AuthSecret, RecipientPublicKey, Salt, SALT_LEN, UNCOMPRESSED_POINT_LEN,
};

/// Result of encrypting one message
///
/// Carries everything the user agent needs to rederive the content key:
/// the ephemeral public key (`Crypto-Key: dh=`) and the salt
/// (`Encryption: salt=`).
#[derive(Clone)]
pub struct EncryptedMessage {
	body: Vec<u8>,
	server_public_key: [u8; UNCOMPRESSED_POINT_LEN],
	salt: Salt,
}

impl EncryptedMessage {
	pub fn content_encoding(&self) -> &'static str {
		CONTENT_ENCODING
	}

	/// Ciphertext followed by the 16 byte tag
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	pub fn into_body(self) -> Vec<u8> {
		self.body
	}

	/// Uncompressed ephemeral public key of this message
	pub fn server_public_key(&self) -> &[u8; UNCOMPRESSED_POINT_LEN] {
		&self.server_public_key
	}

	pub fn server_public_key_base64(&self) -> String {
		b64::encode(self.server_public_key)
	}

	pub fn salt(&self) -> &Salt {
		&self.salt
	}

	pub fn salt_base64(&self) -> String {
		self.salt.to_base64()
	}
}

impl std::fmt::Debug for EncryptedMessage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EncryptedMessage")
			.field("content_encoding", &CONTENT_ENCODING)
			.field("body_len", &self.body.len())
			.field("server_public_key", &self.server_public_key_base64())
			.field("salt", &self.salt)
			.finish()
	}
}

/// Encrypt `plaintext` for the owner of `recipient` / `auth`.
///
/// All input checks run before any randomness is drawn. The ephemeral
/// key pair and salt are created here and dropped on return.
pub fn encrypt(
	plaintext: &[u8],
	recipient: &RecipientPublicKey,
	auth: &AuthSecret,
) -> WpResult<EncryptedMessage> {
	if plaintext.len() > MAX_PLAINTEXT_LEN {
		return Err(Error::validation(
			"payload",
			format!("{} bytes exceeds the {} byte limit", plaintext.len(), MAX_PLAINTEXT_LEN),
		));
	}
	let recipient_point = PublicKey::from_sec1_bytes(recipient.as_bytes())
		.map_err(|_| Error::validation("p256dh", "not a point on P-256"))?;

	let ephemeral = EphemeralSecret::random(&mut OsRng);
	let server_public_key: [u8; UNCOMPRESSED_POINT_LEN] = ephemeral
		.public_key()
		.to_encoded_point(false)
		.as_bytes()
		.try_into()
		.map_err(|_| Error::KeyAgreement("unexpected ephemeral key encoding".into()))?;
	let shared = ephemeral.diffie_hellman(&recipient_point);

	let mut salt = [0u8; SALT_LEN];
	OsRng
		.try_fill_bytes(&mut salt)
		.map_err(|e| Error::Encryption(format!("entropy source failed: {}", e)))?;
	let salt = Salt::new(salt);

	let body = seal(
		shared.raw_secret_bytes(),
		auth,
		&salt,
		recipient.as_bytes(),
		&server_public_key,
		plaintext,
	)?;

	debug!(plaintext_len = plaintext.len(), body_len = body.len(), "encrypted push payload");

	Ok(EncryptedMessage { body, server_public_key, salt })
}

/// Derive the content key for one ECDH secret and seal a single record
pub(crate) fn seal(
	ecdh_secret: &[u8],
	auth: &AuthSecret,
	salt: &Salt,
	recipient_public: &[u8; UNCOMPRESSED_POINT_LEN],
	server_public: &[u8; UNCOMPRESSED_POINT_LEN],
	plaintext: &[u8],
) -> WpResult<Vec<u8>> {
	let keys = kdf::derive(ecdh_secret, auth, salt, recipient_public, server_public)?;

	let mut padded = Zeroizing::new(Vec::with_capacity(PADDING_HEADER_LEN + plaintext.len()));
	padded.extend_from_slice(&[0u8; PADDING_HEADER_LEN]);
	padded.extend_from_slice(plaintext);

	let cipher = Aes128Gcm::new_from_slice(&keys.cek[..])
		.map_err(|e| Error::Encryption(format!("content key rejected: {}", e)))?;
	cipher
		.encrypt(Nonce::from_slice(&keys.nonce[..]), padded.as_slice())
		.map_err(|_| Error::Encryption("AES-GCM seal failed".into()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{decrypt, TAG_LEN};
	use p256::SecretKey;

	fn recipient() -> (SecretKey, RecipientPublicKey, AuthSecret) {
		let secret = SecretKey::random(&mut OsRng);
		let public =
			RecipientPublicKey::from_bytes(secret.public_key().to_encoded_point(false).as_bytes())
				.unwrap();
		let mut auth = [0u8; 16];
		OsRng.fill_bytes(&mut auth);
		(secret, public, AuthSecret::from_bytes(&auth).unwrap())
	}

	fn unhex(s: &str) -> Vec<u8> {
		(0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap()).collect()
	}

	#[test]
	fn test_known_answer() {
		let recipient_scalar: [u8; 32] = std::array::from_fn(|i| i as u8 + 0x01);
		let sender_scalar: [u8; 32] = std::array::from_fn(|i| i as u8 + 0x21);
		let recipient = SecretKey::from_slice(&recipient_scalar).unwrap();
		let sender = SecretKey::from_slice(&sender_scalar).unwrap();

		let recipient_public: [u8; UNCOMPRESSED_POINT_LEN] =
			recipient.public_key().to_encoded_point(false).as_bytes().try_into().unwrap();
		let sender_public: [u8; UNCOMPRESSED_POINT_LEN] =
			sender.public_key().to_encoded_point(false).as_bytes().try_into().unwrap();
		assert_eq!(
			recipient_public.to_vec(),
			unhex(concat!(
				"04515c3d6eb9e396b904d3feca7f54fdcd0cc1e997bf375dca515ad0a6c3b4035f",
				"4536be3a50f318fbf9a5475902a221502bef0d57e08c53b2cc0a56f17d9f9354"
			))
		);

		let shared = p256::ecdh::diffie_hellman(
			sender.to_nonzero_scalar(),
			recipient.public_key().as_affine(),
		);
		assert_eq!(
			shared.raw_secret_bytes().to_vec(),
			unhex("4fe243908f378aa1c2a69538822e6ed908c3225d8692575507c649901245150a")
		);

		let auth = AuthSecret::from_bytes(&[0xa5; 16]).unwrap();
		let salt = Salt::new(std::array::from_fn(|i| i as u8));
		let body = seal(
			shared.raw_secret_bytes(),
			&auth,
			&salt,
			&recipient_public,
			&sender_public,
			b"hello web push",
		)
		.unwrap();

		assert_eq!(
			body,
			unhex("fd5be0e7d2df6062ca8ff06234063078b0289f7f514fdbf7ea5ba98a0c01ebfa")
		);
	}

	#[test]
	fn test_encrypt_then_decrypt_recovers_message() {
		let (secret, public, auth) = recipient();
		let payload = "{ \"message\": \"test message!\" }";

		let msg = encrypt(payload.as_bytes(), &public, &auth).unwrap();
		assert_eq!(msg.content_encoding(), "aesgcm");
		assert_eq!(msg.body().len(), payload.len() + PADDING_HEADER_LEN + TAG_LEN);
		assert_eq!(msg.server_public_key()[0], 0x04);

		let plain =
			decrypt(msg.body(), &secret, &auth, msg.salt(), msg.server_public_key()).unwrap();
		assert_eq!(String::from_utf8(plain).unwrap(), payload);
	}

	#[test]
	fn test_empty_payload_is_a_bare_padding_header() {
		let (secret, public, auth) = recipient();

		let msg = encrypt(b"", &public, &auth).unwrap();
		assert_eq!(msg.body().len(), PADDING_HEADER_LEN + TAG_LEN);

		let plain =
			decrypt(msg.body(), &secret, &auth, msg.salt(), msg.server_public_key()).unwrap();
		assert!(plain.is_empty());
	}

	#[test]
	fn test_each_call_uses_fresh_key_and_salt() {
		let (_secret, public, auth) = recipient();

		let a = encrypt(b"same input", &public, &auth).unwrap();
		let b = encrypt(b"same input", &public, &auth).unwrap();

		assert_ne!(a.salt(), b.salt());
		assert_ne!(a.server_public_key(), b.server_public_key());
		assert_ne!(a.body(), b.body());
	}

	#[test]
	fn test_rejects_point_off_the_curve() {
		let mut bytes = [0u8; UNCOMPRESSED_POINT_LEN];
		bytes[0] = 0x04;
		let bogus = RecipientPublicKey::from_bytes(&bytes).unwrap();
		let auth = AuthSecret::from_bytes(&[1; 16]).unwrap();

		let err = encrypt(b"hi", &bogus, &auth).unwrap_err();
		assert_eq!(err.field(), Some("p256dh"));
	}

	#[test]
	fn test_payload_size_limit() {
		let (secret, public, auth) = recipient();

		let max = vec![0x61; MAX_PLAINTEXT_LEN];
		let msg = encrypt(&max, &public, &auth).unwrap();
		assert_eq!(msg.body().len(), crate::MAX_RECORD_LEN);
		let plain =
			decrypt(msg.body(), &secret, &auth, msg.salt(), msg.server_public_key()).unwrap();
		assert_eq!(plain, max);

		let err = encrypt(&vec![0x61; MAX_PLAINTEXT_LEN + 1], &public, &auth).unwrap_err();
		assert_eq!(err.field(), Some("payload"));
	}

	#[test]
	fn test_debug_does_not_dump_body() {
		let (_secret, public, auth) = recipient();
		let msg = encrypt(b"secret words", &public, &auth).unwrap();
		let dbg = format!("{:?}", msg);
		assert!(dbg.contains("body_len"));
		assert!(!dbg.contains("secret words"));
	}
}

// vim: ts=4
