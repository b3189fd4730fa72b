//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, CPFs
//! their 11 bare digits.

use chrono::{DateTime, Utc};
use cif_core::{
  Cpf,
  person::{Person, Role},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str {
  match role {
    Role::Therapist => "therapist",
    Role::Patient => "patient",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "therapist" => Ok(Role::Therapist),
    "patient" => Ok(Role::Patient),
    other => Err(Error::Corrupt(format!("unknown role: {other:?}"))),
  }
}

// ─── Row type ─────────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "person_id, cpf, email, name, role, \
   therapist_id, password_hash, active, created_at, updated_at";

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:     String,
  pub cpf:           String,
  pub email:         String,
  pub name:          String,
  pub role:          String,
  pub therapist_id:  Option<String>,
  pub password_hash: String,
  pub active:        bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      cpf:           row.get(1)?,
      email:         row.get(2)?,
      name:          row.get(3)?,
      role:          row.get(4)?,
      therapist_id:  row.get(5)?,
      password_hash: row.get(6)?,
      active:        row.get(7)?,
      created_at:    row.get(8)?,
      updated_at:    row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    let cpf = Cpf::parse(&self.cpf)
      .ok_or_else(|| Error::Corrupt(format!("invalid stored cpf: {:?}", self.cpf)))?;

    Ok(Person {
      id: decode_uuid(&self.person_id)?,
      cpf,
      email: self.email,
      name: self.name,
      role: decode_role(&self.role)?,
      therapist_id: self.therapist_id.as_deref().map(decode_uuid).transpose()?,
      password_hash: self.password_hash,
      active: self.active,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
