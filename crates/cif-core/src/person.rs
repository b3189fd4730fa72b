//! Person records: the patients and therapists of the registry.
//!
//! A person is never hard-deleted. Inactivation clears the `active` flag and
//! leaves the row in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cpf::Cpf;

/// Which side of the therapy relationship a person is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Therapist,
  Patient,
}

/// A stored person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:            Uuid,
  pub cpf:           Cpf,
  pub email:         String,
  pub name:          String,
  pub role:          Role,
  /// The therapist treating this patient. Always `None` for therapists.
  pub therapist_id:  Option<Uuid>,
  /// PHC string produced by the configured credential hasher. Never leaves
  /// the process.
  #[serde(skip)]
  pub password_hash: String,
  pub active:        bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl Person {
  pub fn is_patient(&self) -> bool { self.role == Role::Patient }

  pub fn is_therapist(&self) -> bool { self.role == Role::Therapist }
}

// ─── Workflow inputs ─────────────────────────────────────────────────────────

/// A registration request as received from a client. The CPF is still raw
/// and may be missing.
#[derive(Debug, Clone)]
pub struct Registration {
  pub cpf:          Option<String>,
  pub email:        String,
  pub name:         String,
  pub role:         Role,
  pub password:     String,
  /// Only honoured for patients.
  pub therapist_id: Option<Uuid>,
}

/// Profile changes for an existing person. The target id always comes from
/// the caller, never from the payload.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
  pub cpf:          Option<String>,
  pub email:        String,
  pub name:         String,
  /// If set, relink a patient to this therapist.
  pub therapist_id: Option<Uuid>,
}

// ─── Store inputs ────────────────────────────────────────────────────────────

/// Input to [`crate::store::PersonStore::create`]. The id, timestamps and
/// `active` flag are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub cpf:           Cpf,
  pub email:         String,
  pub name:          String,
  pub role:          Role,
  pub therapist_id:  Option<Uuid>,
  pub password_hash: String,
}

/// Input to [`crate::store::PersonStore::update`].
#[derive(Debug, Clone)]
pub struct PersonChanges {
  pub cpf:          Cpf,
  pub email:        String,
  pub name:         String,
  /// `None` leaves the current link untouched.
  pub therapist_id: Option<Uuid>,
}
