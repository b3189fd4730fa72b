//! Password and login handlers.
//!
//! Secrets travel in request headers rather than the URL:
//!
//! | Method | Path | Headers |
//! |--------|------|---------|
//! | `PUT`  | `/updatePassword/{cpf}` | `password` |
//! | `GET`  | `/forgotPassword/{cpf}` | |
//! | `GET`  | `/login` | `userLogin`, `password` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode},
};
use cif_core::{
  PersonService, password::Credentials, person::Person, store::PersonStore,
};

use crate::error::ApiError;

const PASSWORD_HEADER: &str = "password";
const USER_LOGIN_HEADER: &str = "userlogin";

/// Read a header as UTF-8. Missing or non-UTF-8 values read as empty.
fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
}

/// `PUT /updatePassword/{cpf}`
pub async fn update_password<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(cpf): Path<String>,
  headers: HeaderMap,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  let password = header(&headers, PASSWORD_HEADER);
  Ok(Json(service.update_password(password, &cpf).await?))
}

/// `GET /forgotPassword/{cpf}`
pub async fn forgot_password<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(cpf): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  service.forgot_password(&cpf).await?;
  Ok(StatusCode::OK)
}

/// `GET /login`
pub async fn login<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  headers: HeaderMap,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  let user_login = header(&headers, USER_LOGIN_HEADER);
  if user_login.is_empty() {
    return Err(ApiError::Unauthorized);
  }
  let password = header(&headers, PASSWORD_HEADER);
  Ok(Json(service.login(user_login, password).await?))
}
