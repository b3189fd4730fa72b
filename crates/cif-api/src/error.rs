//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every workflow error converts into [`ApiError`]; the status code and the
//! `{"error": ...}` body are decided here and nowhere else.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use cif_core::{
  BoxError, LoginError, LookupError, PasswordError, RegistrationError,
  UpdateError, password::PasswordRule,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid cpf")]
  InvalidCpf,

  #[error("{0}")]
  InvalidPassword(PasswordRule),

  #[error("therapist not found: {0}")]
  TherapistNotFound(Uuid),

  #[error("cpf already registered")]
  CpfAlreadyRegistered,

  #[error("email already registered")]
  EmailAlreadyRegistered,

  #[error("person not found")]
  PersonNotFound,

  #[error("unauthorized")]
  Unauthorized,

  #[error("internal error: {0}")]
  Internal(#[source] BoxError),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::InvalidCpf | ApiError::InvalidPassword(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::TherapistNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::CpfAlreadyRegistered | ApiError::EmailAlreadyRegistered => {
        StatusCode::CONFLICT
      }
      ApiError::PersonNotFound => StatusCode::NOT_FOUND,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::InvalidCpf => "INVALID_CPF".into(),
      ApiError::InvalidPassword(rule) => rule.to_string(),
      ApiError::TherapistNotFound(_) => "THERAPIST_NOT_FOUND".into(),
      ApiError::CpfAlreadyRegistered => "CPF_ALREADY_REGISTERED".into(),
      ApiError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED".into(),
      ApiError::PersonNotFound => "PERSON_NOT_FOUND".into(),
      ApiError::Unauthorized => "UNAUTHORIZED".into(),
      ApiError::Internal(_) => "internal server error".into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "error": self.message() }))).into_response()
  }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<RegistrationError> for ApiError {
  fn from(e: RegistrationError) -> Self {
    match e {
      RegistrationError::InvalidCpf => ApiError::InvalidCpf,
      RegistrationError::TherapistNotFound(id) => ApiError::TherapistNotFound(id),
      RegistrationError::CpfAlreadyRegistered => ApiError::CpfAlreadyRegistered,
      RegistrationError::EmailAlreadyRegistered => {
        ApiError::EmailAlreadyRegistered
      }
      RegistrationError::RegistrationFailed(e) => ApiError::Internal(e),
    }
  }
}

impl From<UpdateError> for ApiError {
  fn from(e: UpdateError) -> Self {
    match e {
      UpdateError::InvalidCpf => ApiError::InvalidCpf,
      UpdateError::TherapistNotFound(id) => ApiError::TherapistNotFound(id),
      UpdateError::CpfAlreadyRegistered => ApiError::CpfAlreadyRegistered,
      UpdateError::EmailAlreadyRegistered => ApiError::EmailAlreadyRegistered,
      UpdateError::PersonNotFound(_) => ApiError::PersonNotFound,
      UpdateError::UpdateFailed(e) => ApiError::Internal(e),
    }
  }
}

impl From<PasswordError> for ApiError {
  fn from(e: PasswordError) -> Self {
    match e {
      PasswordError::InvalidPassword(rule) => ApiError::InvalidPassword(rule),
      PasswordError::InvalidCpf => ApiError::InvalidCpf,
      PasswordError::PersonNotFound => ApiError::PersonNotFound,
      PasswordError::StoreUnavailable(e) => ApiError::Internal(e),
    }
  }
}

impl From<LookupError> for ApiError {
  fn from(e: LookupError) -> Self {
    match e {
      LookupError::InvalidCpf => ApiError::InvalidCpf,
      LookupError::PersonNotFound => ApiError::PersonNotFound,
      LookupError::StoreUnavailable(e) => ApiError::Internal(e),
    }
  }
}

impl From<LoginError> for ApiError {
  fn from(e: LoginError) -> Self {
    match e {
      LoginError::Unauthorized => ApiError::Unauthorized,
      LoginError::StoreUnavailable(e) => ApiError::Internal(e),
    }
  }
}
