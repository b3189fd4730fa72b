//! SQL schema for the person store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows are never deleted; inactivation clears `active`.
CREATE TABLE IF NOT EXISTS persons (
    person_id     TEXT PRIMARY KEY,
    cpf           TEXT NOT NULL UNIQUE,             -- 11 bare digits
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name          TEXT NOT NULL,
    role          TEXT NOT NULL CHECK (role IN ('therapist', 'patient')),
    therapist_id  TEXT REFERENCES persons(person_id),
    password_hash TEXT NOT NULL,                    -- PHC string
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL,                    -- RFC 3339 UTC
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS persons_role_idx      ON persons(role);
CREATE INDEX IF NOT EXISTS persons_therapist_idx ON persons(therapist_id);

PRAGMA user_version = 1;
";
