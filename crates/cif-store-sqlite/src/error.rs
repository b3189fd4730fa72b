//! Error type for `cif-store-sqlite`.

use cif_core::store::{FailureKind, StoreFailure, UniqueField};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column holds a value the domain types reject.
  #[error("corrupt row: {0}")]
  Corrupt(String),

  /// Caught by the pre-insert check inside the write transaction.
  #[error("unique constraint violated on {0:?}")]
  Duplicate(UniqueField),

  #[error("person not found: {0}")]
  PersonNotFound(uuid::Uuid),
}

impl StoreFailure for Error {
  fn kind(&self) -> FailureKind {
    match self {
      Error::Duplicate(field) => FailureKind::UniqueViolation(*field),
      Error::PersonNotFound(_) => FailureKind::NotFound,
      Error::Database(e) if is_unique_violation(e) => {
        FailureKind::UniqueViolation(UniqueField::Unspecified)
      }
      _ => FailureKind::Other,
    }
  }
}

/// A UNIQUE constraint that fired despite the pre-check.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
