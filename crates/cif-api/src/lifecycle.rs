//! Soft delete and reactivation.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use cif_core::{
  PersonService, password::Credentials, person::Person, store::PersonStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `DELETE /delete/{id}`: clears the active flag, the record stays.
pub async fn inactivate<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  service.inactivate(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `PUT /reactivatePerson/{id}`
pub async fn reactivate<S, C>(
  State(service): State<Arc<PersonService<S, C>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
  C: Credentials,
{
  Ok(Json(service.reactivate(id).await?))
}
