//! [`SqliteStore`], the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use cif_core::{
  Cpf,
  person::{NewPerson, Person, PersonChanges, Role},
  store::{PersonStore, UniqueField},
};

use crate::{
  encode::{PERSON_COLUMNS, RawPerson, encode_dt, encode_role, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls
/// are serialized on the connection thread, so the duplicate check and the
/// write it guards cannot interleave with another request.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Result of a guarded write, carried out of the connection thread.
enum Written {
  Row(RawPerson),
  Clash(UniqueField),
  Missing,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one person matching `filter` (a WHERE clause over `?1`).
  async fn fetch_one(&self, filter: &'static str, key: String) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_one(conn, filter, &key)?))
      .await?;
    raw.map(RawPerson::into_person).transpose()
  }

  /// Fetch every person matching `filter` (a WHERE clause over `?1`).
  async fn fetch_all(&self, filter: &'static str, key: String) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE {filter} ORDER BY name");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

fn select_one(
  conn: &rusqlite::Connection,
  filter: &str,
  key: &str,
) -> rusqlite::Result<Option<RawPerson>> {
  let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE {filter}");
  conn
    .query_row(&sql, rusqlite::params![key], RawPerson::from_row)
    .optional()
}

/// Report which unique column, if any, already holds `cpf` or `email` on a
/// row other than `exclude_id`.
fn find_clash(
  conn: &rusqlite::Connection,
  cpf: &str,
  email: &str,
  exclude_id: &str,
) -> rusqlite::Result<Option<UniqueField>> {
  let taken = |column: &str, value: &str| -> rusqlite::Result<bool> {
    let sql = format!("SELECT 1 FROM persons WHERE {column} = ?1 AND person_id != ?2");
    Ok(
      conn
        .query_row(&sql, rusqlite::params![value, exclude_id], |_| Ok(()))
        .optional()?
        .is_some(),
    )
  };

  if taken("cpf", cpf)? {
    return Ok(Some(UniqueField::Cpf));
  }
  if taken("email", email)? {
    return Ok(Some(UniqueField::Email));
  }
  Ok(None)
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewPerson) -> Result<Person> {
    let now = Utc::now();
    let person = Person {
      id:            Uuid::new_v4(),
      cpf:           input.cpf,
      email:         input.email,
      name:          input.name,
      role:          input.role,
      therapist_id:  input.therapist_id,
      password_hash: input.password_hash,
      active:        true,
      created_at:    now,
      updated_at:    now,
    };

    let id_str        = encode_uuid(person.id);
    let cpf_str       = person.cpf.as_str().to_owned();
    let email         = person.email.clone();
    let name          = person.name.clone();
    let role_str      = encode_role(person.role).to_owned();
    let therapist_str = person.therapist_id.map(encode_uuid);
    let hash          = person.password_hash.clone();
    let at_str        = encode_dt(now);

    let clash = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if let Some(field) = find_clash(&tx, &cpf_str, &email, &id_str)? {
          return Ok(Some(field));
        }
        tx.execute(
          "INSERT INTO persons (
             person_id, cpf, email, name, role, therapist_id,
             password_hash, active, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)",
          rusqlite::params![
            id_str,
            cpf_str,
            email,
            name,
            role_str,
            therapist_str,
            hash,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(None)
      })
      .await?;

    match clash {
      Some(field) => Err(Error::Duplicate(field)),
      None => Ok(person),
    }
  }

  async fn update(&self, id: Uuid, changes: PersonChanges) -> Result<Person> {
    let id_str        = encode_uuid(id);
    let cpf_str       = changes.cpf.as_str().to_owned();
    let email         = changes.email;
    let name          = changes.name;
    let therapist_str = changes.therapist_id.map(encode_uuid);
    let at_str        = encode_dt(Utc::now());

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if select_one(&tx, "person_id = ?1", &id_str)?.is_none() {
          return Ok(Written::Missing);
        }
        if let Some(field) = find_clash(&tx, &cpf_str, &email, &id_str)? {
          return Ok(Written::Clash(field));
        }
        // The therapist link only applies to patients.
        let n = tx.execute(
          "UPDATE persons SET
             cpf = ?2, email = ?3, name = ?4,
             therapist_id = CASE WHEN role = 'patient'
                                 THEN COALESCE(?5, therapist_id)
                                 ELSE NULL END,
             updated_at = ?6
           WHERE person_id = ?1",
          rusqlite::params![id_str, cpf_str, email, name, therapist_str, at_str],
        )?;
        if n == 0 {
          return Ok(Written::Missing);
        }
        let row = select_one(&tx, "person_id = ?1", &id_str)?;
        tx.commit()?;
        Ok(row.map_or(Written::Missing, Written::Row))
      })
      .await?;

    match written {
      Written::Row(raw) => raw.into_person(),
      Written::Clash(field) => Err(Error::Duplicate(field)),
      Written::Missing => Err(Error::PersonNotFound(id)),
    }
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self.fetch_one("person_id = ?1", encode_uuid(id)).await
  }

  async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<Person>> {
    self.fetch_one("cpf = ?1", cpf.as_str().to_owned()).await
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Person>> {
    self.fetch_one("email = ?1", email.to_owned()).await
  }

  async fn list_by_role(&self, role: Role) -> Result<Vec<Person>> {
    self.fetch_all("role = ?1", encode_role(role).to_owned()).await
  }

  async fn find_patients_by_therapist(&self, therapist_id: Uuid) -> Result<Vec<Person>> {
    self
      .fetch_all("role = 'patient' AND therapist_id = ?1", encode_uuid(therapist_id))
      .await
  }

  async fn set_password(&self, cpf: &Cpf, password_hash: String) -> Result<Option<Person>> {
    let cpf_str = cpf.as_str().to_owned();
    let at_str  = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE persons SET password_hash = ?2, updated_at = ?3 WHERE cpf = ?1",
          rusqlite::params![cpf_str, password_hash, at_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(select_one(conn, "cpf = ?1", &cpf_str)?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE persons SET active = ?2, updated_at = ?3 WHERE person_id = ?1",
          rusqlite::params![id_str, active, at_str],
        )?;
        if n == 0 {
          return Ok(None);
        }
        Ok(select_one(conn, "person_id = ?1", &id_str)?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}
