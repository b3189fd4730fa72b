//! Argon2 implementation of [`Credentials`].

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use cif_core::password::{CredentialError, Credentials};
use rand_core::OsRng;

/// Hashes passwords with argon2id and a fresh random salt, producing a PHC
/// string such as `$argon2id$v=19$…`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Credentials;

impl Credentials for Argon2Credentials {
  fn hash(&self, password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
      .map_err(|e| CredentialError(e.to_string()))
  }

  fn verify(&self, password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  }
}
