//! Read-only handlers: single-person lookups and listings.
//!
//! Listings include inactive persons.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use cif_core::{
  PersonService, password::Credentials, person::Person, store::PersonStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Listings ─────────────────────────────────────────────────────────────────

/// `GET /listAllPatient`
pub async fn list_patients<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.list_all_patients().await?))
}

/// `GET /listAllTherapist`
pub async fn list_therapists<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.list_all_therapists().await?))
}

/// `GET /findPatientsByTherapist/{id}`. An unknown therapist yields an
/// empty list.
pub async fn patients_by_therapist<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.find_patients_by_therapist(id).await?))
}

// ─── Single person ────────────────────────────────────────────────────────────

/// `GET /findById/{id}`
pub async fn find_by_id<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.find_by_id(id).await?))
}

/// `GET /findbycpf/{cpf}`
pub async fn find_by_cpf<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(cpf): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.find_by_cpf(&cpf).await?))
}
