//! SQL schema for the cumple SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL,
    birth_date    TEXT NOT NULL,              -- YYYY-MM-DD; no time, no zone
    phone         TEXT,
    photo         TEXT,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    can_edit      INTEGER NOT NULL DEFAULT 1,
    password_hash TEXT,                       -- argon2 PHC string
    created_at    TEXT NOT NULL               -- RFC 3339 UTC; server-assigned
);

-- At most one admin.
CREATE UNIQUE INDEX IF NOT EXISTS people_single_admin
    ON people(is_admin) WHERE is_admin = 1;

CREATE INDEX IF NOT EXISTS people_birth_date_idx ON people(birth_date);

PRAGMA user_version = 1;
";
