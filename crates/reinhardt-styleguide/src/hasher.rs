//! Credential hashing for the baseline accounts.
//!
//! Baseline accounts get a random secret that nobody ever sees: the secret
//! is generated, hashed, and dropped.

use rand::RngCore;

use crate::error::StyleguideResult;

/// Length of generated secrets in bytes.
pub const SECRET_LENGTH: usize = 32;

/// Returns fresh random secret bytes.
pub fn generate_secret() -> [u8; SECRET_LENGTH] {
	let mut secret = [0u8; SECRET_LENGTH];
	rand::thread_rng().fill_bytes(&mut secret);
	secret
}

/// Turns secret bytes into an opaque, salted credential string.
pub trait CredentialHasher: Send + Sync {
	/// Hashes `secret`.
	fn hash(&self, secret: &[u8]) -> StyleguideResult<String>;
}

/// Argon2id credential hasher producing PHC strings.
///
/// # Examples
///
/// ```
/// use reinhardt_styleguide::hasher::{Argon2CredentialHasher, CredentialHasher, generate_secret};
///
/// let hasher = Argon2CredentialHasher::new();
/// let hash = hasher.hash(&generate_secret()).unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
#[cfg(feature = "argon2-hasher")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher;

#[cfg(feature = "argon2-hasher")]
impl Argon2CredentialHasher {
	/// Creates a new Argon2 credential hasher.
	pub fn new() -> Self {
		Self
	}
}

#[cfg(feature = "argon2-hasher")]
impl CredentialHasher for Argon2CredentialHasher {
	fn hash(&self, secret: &[u8]) -> StyleguideResult<String> {
		use crate::error::StyleguideError;
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};

		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);

		let salt = SaltString::encode_b64(&salt_bytes)
			.map_err(|e| StyleguideError::Hashing(e.to_string()))?;

		Argon2::default()
			.hash_password(secret, &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| StyleguideError::Hashing(e.to_string()))
	}
}
