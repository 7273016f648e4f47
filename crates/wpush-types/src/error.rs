//! Error type shared by all wpush crates

use std::fmt;

pub type WpResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// An input failed validation before any cryptographic work started.
	///
	/// `field` names the offending input (`p256dh`, `auth`, `payload`,
	/// `subject`, `audience`, ...).
	ValidationError { field: &'static str, reason: String },

	/// ECDH key agreement failed
	KeyAgreement(String),
	/// Key derivation or AEAD sealing failed
	Encryption(String),
	/// VAPID token signing failed
	Signing(String),

	/// AEAD tag did not authenticate the record
	DecryptionFailed,
	/// Record authenticated but its layout is wrong (short body, bad padding)
	InvalidRecord(String),
	/// VAPID token signature, audience or expiration check failed
	VerificationFailed(String),

	Serialization(String),
	/// The transport collaborator could not be set up
	Transport(String),
}

impl Error {
	pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
		Error::ValidationError { field, reason: reason.into() }
	}

	/// Name of the input that failed validation, if this is a validation error
	pub fn field(&self) -> Option<&'static str> {
		match self {
			Error::ValidationError { field, .. } => Some(field),
			_ => None,
		}
	}

	pub fn is_validation(&self) -> bool {
		matches!(self, Error::ValidationError { .. })
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::ValidationError { field, reason } => {
				write!(f, "invalid {}: {}", field, reason)
			}
			Error::KeyAgreement(msg) => write!(f, "key agreement failed: {}", msg),
			Error::Encryption(msg) => write!(f, "encryption failed: {}", msg),
			Error::Signing(msg) => write!(f, "signing failed: {}", msg),
			Error::DecryptionFailed => write!(f, "decryption failed: record not authentic"),
			Error::InvalidRecord(msg) => write!(f, "invalid record: {}", msg),
			Error::VerificationFailed(msg) => write!(f, "token verification failed: {}", msg),
			Error::Serialization(msg) => write!(f, "serialization error: {}", msg),
			Error::Transport(msg) => write!(f, "transport error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}


// vim: ts=4
