//! [`PersonService`]: the registration, update, password and lifecycle
//! workflows.
//!
//! Every operation validates its input first, makes the minimum number of
//! store calls, and classifies the outcome into the operation's error enum.
//! Catch-all failures are logged here with their cause; callers only map them.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  cpf::Cpf,
  error::{
    BoxError, LoginError, LookupError, PasswordError, RegistrationError,
    UpdateError,
  },
  password::{CredentialError, Credentials, check_password},
  person::{NewPerson, Person, PersonChanges, ProfileUpdate, Registration, Role},
  store::{FailureKind, PersonStore, StoreFailure, UniqueField},
};

/// The person workflows, bound to a store and a credential hasher.
pub struct PersonService<S, C> {
  store:       Arc<S>,
  credentials: C,
}

/// Outcome of resolving a therapist reference.
enum TherapistLink {
  Found,
  Missing,
}

impl<S, C> PersonService<S, C>
where
  S: PersonStore,
  C: Credentials,
{
  pub fn new(store: Arc<S>, credentials: C) -> Self { Self { store, credentials } }

  // ── Registration ──────────────────────────────────────────────────────────

  /// Register a new therapist or patient.
  ///
  /// The CPF is checked before anything else; a patient's therapist must
  /// resolve before the single `create` call is made.
  pub async fn register(
    &self,
    request: Registration,
  ) -> Result<Person, RegistrationError> {
    info!(role = ?request.role, "register person started");

    let Some(cpf) = request.cpf.as_deref().and_then(Cpf::parse) else {
      warn!("registration rejected: invalid cpf");
      return Err(RegistrationError::InvalidCpf);
    };

    let therapist_id = match (request.role, request.therapist_id) {
      (Role::Patient, Some(id)) => {
        match self.resolve_therapist(id).await {
          Ok(TherapistLink::Found) => Some(id),
          Ok(TherapistLink::Missing) => {
            warn!(%id, "registration rejected: therapist not found");
            return Err(RegistrationError::TherapistNotFound(id));
          }
          Err(e) => {
            error!(error = %e, "therapist lookup failed during registration");
            return Err(RegistrationError::RegistrationFailed(Box::new(e)));
          }
        }
      }
      _ => None,
    };

    let password_hash = self
      .credentials
      .hash(&request.password)
      .map_err(|e| RegistrationError::RegistrationFailed(hash_failed(e)))?;

    let input = NewPerson {
      cpf,
      email: request.email.trim().to_owned(),
      name: request.name,
      role: request.role,
      therapist_id,
      password_hash,
    };

    match self.store.create(input).await {
      Ok(person) => {
        info!(id = %person.id, "person registered");
        Ok(person)
      }
      Err(e) => Err(match e.kind() {
        FailureKind::UniqueViolation(UniqueField::Cpf) => {
          warn!("registration rejected: cpf already registered");
          RegistrationError::CpfAlreadyRegistered
        }
        FailureKind::UniqueViolation(_) => {
          warn!("registration rejected: email already registered");
          RegistrationError::EmailAlreadyRegistered
        }
        FailureKind::NotFound | FailureKind::Other => {
          error!(error = %e, "could not register the person");
          RegistrationError::RegistrationFailed(Box::new(e))
        }
      }),
    }
  }

  // ── Update ────────────────────────────────────────────────────────────────

  /// Overwrite the profile of person `id`. The id argument is authoritative.
  pub async fn update_person(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> Result<Person, UpdateError> {
    info!(%id, "update person started");

    let Some(cpf) = update.cpf.as_deref().and_then(Cpf::parse) else {
      warn!(%id, "update rejected: invalid cpf");
      return Err(UpdateError::InvalidCpf);
    };

    if let Some(therapist_id) = update.therapist_id {
      match self.resolve_therapist(therapist_id).await {
        Ok(TherapistLink::Found) => {}
        Ok(TherapistLink::Missing) => {
          return Err(UpdateError::TherapistNotFound(therapist_id));
        }
        Err(e) => {
          error!(%id, error = %e, "therapist lookup failed during update");
          return Err(UpdateError::UpdateFailed(Box::new(e)));
        }
      }
    }

    let changes = PersonChanges {
      cpf,
      email: update.email.trim().to_owned(),
      name: update.name,
      therapist_id: update.therapist_id,
    };

    self.store.update(id, changes).await.map_err(|e| match e.kind() {
      FailureKind::NotFound => UpdateError::PersonNotFound(id),
      FailureKind::UniqueViolation(UniqueField::Cpf) => {
        UpdateError::CpfAlreadyRegistered
      }
      FailureKind::UniqueViolation(_) => UpdateError::EmailAlreadyRegistered,
      FailureKind::Other => {
        error!(%id, error = %e, "could not update person");
        UpdateError::UpdateFailed(Box::new(e))
      }
    })
  }

  /// Replace the password of the person holding `cpf`.
  pub async fn update_password(
    &self,
    password: &str,
    cpf: &str,
  ) -> Result<Person, PasswordError> {
    info!("update password started");

    check_password(password).map_err(PasswordError::InvalidPassword)?;
    let cpf = Cpf::parse(cpf).ok_or(PasswordError::InvalidCpf)?;

    let hash = self
      .credentials
      .hash(password)
      .map_err(|e| PasswordError::StoreUnavailable(hash_failed(e)))?;

    self
      .store
      .set_password(&cpf, hash)
      .await
      .map_err(|e| PasswordError::StoreUnavailable(unavailable(e)))?
      .ok_or(PasswordError::PersonNotFound)
  }

  /// Acknowledge a forgotten-password request for `cpf`.
  ///
  /// Only confirms the person exists; no password is ever returned and no
  /// reset is delivered from here.
  pub async fn forgot_password(&self, cpf: &str) -> Result<(), LookupError> {
    let person = self.find_by_cpf(cpf).await?;
    info!(id = %person.id, "password reset requested");
    Ok(())
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  pub async fn find_by_id(&self, id: Uuid) -> Result<Person, LookupError> {
    self
      .store
      .find_by_id(id)
      .await
      .map_err(|e| LookupError::StoreUnavailable(unavailable(e)))?
      .ok_or(LookupError::PersonNotFound)
  }

  /// Look a person up by CPF. Malformed input never reaches the store.
  pub async fn find_by_cpf(&self, cpf: &str) -> Result<Person, LookupError> {
    let cpf = Cpf::parse(cpf).ok_or(LookupError::InvalidCpf)?;
    self
      .store
      .find_by_cpf(&cpf)
      .await
      .map_err(|e| LookupError::StoreUnavailable(unavailable(e)))?
      .ok_or(LookupError::PersonNotFound)
  }

  pub async fn list_all_patients(&self) -> Result<Vec<Person>, LookupError> {
    self.list_by_role(Role::Patient).await
  }

  pub async fn list_all_therapists(&self) -> Result<Vec<Person>, LookupError> {
    self.list_by_role(Role::Therapist).await
  }

  pub async fn find_patients_by_therapist(
    &self,
    therapist_id: Uuid,
  ) -> Result<Vec<Person>, LookupError> {
    self
      .store
      .find_patients_by_therapist(therapist_id)
      .await
      .map_err(|e| LookupError::StoreUnavailable(unavailable(e)))
  }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Logical delete: clear the `active` flag.
  pub async fn inactivate(&self, id: Uuid) -> Result<Person, LookupError> {
    info!(%id, "inactivate person");
    self.set_active(id, false).await
  }

  pub async fn reactivate(&self, id: Uuid) -> Result<Person, LookupError> {
    info!(%id, "reactivate person");
    self.set_active(id, true).await
  }

  // ── Login ─────────────────────────────────────────────────────────────────

  /// Check credentials. `user_login` is either a CPF or an email address.
  /// Inactive persons cannot log in.
  pub async fn login(
    &self,
    user_login: &str,
    password: &str,
  ) -> Result<Person, LoginError> {
    info!("login started");

    let found = match Cpf::parse(user_login) {
      Some(cpf) => self.store.find_by_cpf(&cpf).await,
      None => self.store.find_by_email(user_login.trim()).await,
    }
    .map_err(|e| LoginError::StoreUnavailable(unavailable(e)))?;

    match found {
      Some(person)
        if person.active
          && self.credentials.verify(password, &person.password_hash) =>
      {
        Ok(person)
      }
      _ => {
        warn!("login rejected");
        Err(LoginError::Unauthorized)
      }
    }
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn resolve_therapist(&self, id: Uuid) -> Result<TherapistLink, S::Error> {
    Ok(match self.store.find_by_id(id).await? {
      Some(p) if p.is_therapist() => TherapistLink::Found,
      _ => TherapistLink::Missing,
    })
  }

  async fn list_by_role(&self, role: Role) -> Result<Vec<Person>, LookupError> {
    self
      .store
      .list_by_role(role)
      .await
      .map_err(|e| LookupError::StoreUnavailable(unavailable(e)))
  }

  async fn set_active(&self, id: Uuid, active: bool) -> Result<Person, LookupError> {
    self
      .store
      .set_active(id, active)
      .await
      .map_err(|e| LookupError::StoreUnavailable(unavailable(e)))?
      .ok_or(LookupError::PersonNotFound)
  }
}

fn unavailable<E: StoreFailure>(e: E) -> BoxError {
  error!(error = %e, "person store call failed");
  Box::new(e)
}

fn hash_failed(e: CredentialError) -> BoxError {
  error!(error = %e, "password hashing failed");
  Box::new(e)
}
