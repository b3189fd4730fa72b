//! Handlers for registering and updating persons.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | 201 with the stored person |
//! | `PUT`  | `/updatePerson/{id}` | The path id wins over any body id |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cif_core::{
  PersonService,
  password::Credentials,
  person::{Person, ProfileUpdate, Registration, Role},
  store::PersonStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub cpf:          Option<String>,
  pub email:        String,
  pub name:         String,
  pub role:         Role,
  pub password:     String,
  #[serde(default)]
  pub therapist_id: Option<Uuid>,
}

impl From<RegisterBody> for Registration {
  fn from(body: RegisterBody) -> Self {
    Registration {
      cpf:          body.cpf,
      email:        body.email,
      name:         body.name,
      role:         body.role,
      password:     body.password,
      therapist_id: body.therapist_id,
    }
  }
}

/// `POST /register`
pub async fn register<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  let person = service.register(body.into()).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  /// Accepted for compatibility and ignored.
  #[serde(default)]
  pub id:           Option<Uuid>,
  pub cpf:          Option<String>,
  pub email:        String,
  pub name:         String,
  #[serde(default)]
  pub therapist_id: Option<Uuid>,
}

impl From<UpdateBody> for ProfileUpdate {
  fn from(body: UpdateBody) -> Self {
    ProfileUpdate {
      cpf:          body.cpf,
      email:        body.email,
      name:         body.name,
      therapist_id: body.therapist_id,
    }
  }
}

/// `PUT /updatePerson/{id}`
pub async fn update<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.update_person(id, body.into()).await?))
}
