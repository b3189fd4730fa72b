//! The `PersonStore` trait and the structural failure classification it
//! reports.
//!
//! The trait is implemented by storage backends (e.g. `cif-store-sqlite`).
//! [`crate::service::PersonService`] depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  cpf::Cpf,
  person::{NewPerson, Person, PersonChanges, Role},
};

// ─── Failure classification ──────────────────────────────────────────────────

/// The unique field a rejected write collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
  Cpf,
  Email,
  /// The backend knows a uniqueness rule fired but not which one.
  Unspecified,
}

/// What kind of failure a store error represents, as far as the workflows
/// are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  UniqueViolation(UniqueField),
  /// The targeted record does not exist.
  NotFound,
  Other,
}

/// Implemented by every store error type so workflows can classify failures
/// without inspecting messages.
pub trait StoreFailure: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> FailureKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person store backend.
///
/// Backends must enforce uniqueness of `cpf` and `email` atomically and
/// report violations through [`StoreFailure::kind`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: StoreFailure;

  /// Persist a new, active person and return it with its assigned id.
  fn create(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Overwrite the profile fields of `id`. Fails with
  /// [`FailureKind::NotFound`] if there is no such person.
  fn update(
    &self,
    id: Uuid,
    changes: PersonChanges,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  fn find_by_cpf<'a>(
    &'a self,
    cpf: &'a Cpf,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// All persons with `role`, active or not.
  fn list_by_role(
    &self,
    role: Role,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// All patients linked to `therapist_id`. Empty if there are none.
  fn find_patients_by_therapist(
    &self,
    therapist_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Replace the stored password hash. Returns `None` if no person has `cpf`.
  fn set_password<'a>(
    &'a self,
    cpf: &'a Cpf,
    password_hash: String,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Set the `active` flag. Returns `None` if `id` does not exist.
  fn set_active(
    &self,
    id: Uuid,
    active: bool,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;
}
