//! Password policy and the credential-hashing seam.

use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 8;

/// The rule a rejected password broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordRule {
  #[error("password must not be empty")]
  Empty,

  #[error("password must be at least 6 characters and at most 8")]
  Length,
}

/// Check `password` against the length policy. Length is counted in
/// characters, not bytes.
pub fn check_password(password: &str) -> Result<(), PasswordRule> {
  if password.is_empty() {
    return Err(PasswordRule::Empty);
  }
  let len = password.chars().count();
  if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
    return Err(PasswordRule::Length);
  }
  Ok(())
}

#[derive(Debug, Error)]
#[error("credential hashing failed: {0}")]
pub struct CredentialError(pub String);

/// Hashes and verifies passwords. Implementations decide the algorithm.
pub trait Credentials: Send + Sync {
  /// Produce a self-describing hash (e.g. a PHC string) for `password`.
  fn hash(&self, password: &str) -> Result<String, CredentialError>;

  /// Check `password` against a hash previously produced by [`Self::hash`].
  /// A malformed hash verifies as `false`.
  fn verify(&self, password: &str, hash: &str) -> bool;
}
