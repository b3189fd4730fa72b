//! Outcome types for the person workflows.
//!
//! Each workflow gets its own enum so callers match exactly the outcomes that
//! operation can produce.

use thiserror::Error;
use uuid::Uuid;

use crate::password::PasswordRule;

/// A boxed collaborator failure carried by the catch-all variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistrationError {
  #[error("missing or invalid cpf")]
  InvalidCpf,

  #[error("therapist not found: {0}")]
  TherapistNotFound(Uuid),

  #[error("cpf already registered")]
  CpfAlreadyRegistered,

  #[error("email already registered")]
  EmailAlreadyRegistered,

  #[error("could not register the person: {0}")]
  RegistrationFailed(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum UpdateError {
  #[error("missing or invalid cpf")]
  InvalidCpf,

  #[error("therapist not found: {0}")]
  TherapistNotFound(Uuid),

  #[error("cpf already registered")]
  CpfAlreadyRegistered,

  #[error("email already registered")]
  EmailAlreadyRegistered,

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("could not update person: {0}")]
  UpdateFailed(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum PasswordError {
  #[error("invalid password: {0}")]
  InvalidPassword(PasswordRule),

  #[error("invalid cpf")]
  InvalidCpf,

  #[error("person not found")]
  PersonNotFound,

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] BoxError),
}

/// Outcome of lookups, listings and lifecycle changes.
#[derive(Debug, Error)]
pub enum LookupError {
  #[error("invalid cpf")]
  InvalidCpf,

  #[error("person not found")]
  PersonNotFound,

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] BoxError),
}

#[derive(Debug, Error)]
pub enum LoginError {
  #[error("wrong login or password")]
  Unauthorized,

  #[error("store unavailable: {0}")]
  StoreUnavailable(#[source] BoxError),
}
