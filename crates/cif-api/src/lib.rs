//! JSON REST API for the person registry.
//!
//! Exposes an axum [`Router`] backed by a [`PersonService`] over any
//! [`PersonStore`]. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/v1/person", cif_api::person_router(service.clone()))
//! ```

pub mod account;
pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod lookup;
pub mod registration;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use cif_core::{PersonService, password::Credentials, store::PersonStore};

pub use credentials::Argon2Credentials;
pub use error::ApiError;

/// Build a fully-materialised person router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn person_router<S, C>(service: Arc<PersonService<S, C>>) -> Router<()>
where
  S: PersonStore + 'static,
  C: Credentials + 'static,
{
  Router::new()
    // Registration
    .route("/register", post(registration::register::<S, C>))
    .route("/updatePerson/{id}", put(registration::update::<S, C>))
    // Lookups
    .route("/listAllPatient", get(lookup::list_patients::<S, C>))
    .route("/listAllTherapist", get(lookup::list_therapists::<S, C>))
    .route(
      "/findPatientsByTherapist/{id}",
      get(lookup::patients_by_therapist::<S, C>),
    )
    .route("/findById/{id}", get(lookup::find_by_id::<S, C>))
    .route("/findbycpf/{cpf}", get(lookup::find_by_cpf::<S, C>))
    // Lifecycle
    .route("/delete/{id}", delete(lifecycle::inactivate::<S, C>))
    .route("/reactivatePerson/{id}", put(lifecycle::reactivate::<S, C>))
    // Account
    .route("/updatePassword/{cpf}", put(account::update_password::<S, C>))
    .route("/forgotPassword/{cpf}", get(account::forgot_password::<S, C>))
    .route("/login", get(account::login::<S, C>))
    .with_state(service)
}
