//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, birth dates as `YYYY-MM-DD`,
//! and UUIDs as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use cumple_core::{
  CalendarDate, person::Person, store::AdminCredentials,
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

// ─── CalendarDate ─────────────────────────────────────────────────────────────

pub fn encode_date(d: CalendarDate) -> String { d.to_string() }

/// Only the `YYYY-MM-DD` shape is enforced here. An out-of-range triple is
/// returned as-is so that the engine can skip and report the record.
pub fn decode_date(s: &str) -> Result<CalendarDate> { Ok(s.parse()?) }

/// Like [`decode_date`], but a column that is not `YYYY-MM-DD` at all becomes
/// [`CalendarDate::UNREADABLE`] so one bad row cannot fail a whole read.
pub fn decode_birth_date(person_id: &str, s: &str) -> CalendarDate {
  decode_date(s).unwrap_or_else(|e| {
    tracing::warn!(person_id, raw = s, error = %e, "unreadable birth date column");
    CalendarDate::UNREADABLE
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every person read, in [`RawPerson`] field order.
pub const PERSON_COLUMNS: &str = "person_id, name, email, birth_date, phone, photo, \
                                  is_admin, can_edit, created_at, password_hash";

/// Raw values read directly from a `people` row.
pub struct RawPerson {
  pub person_id:     String,
  pub name:          String,
  pub email:         String,
  pub birth_date:    String,
  pub phone:         Option<String>,
  pub photo:         Option<String>,
  pub is_admin:      bool,
  pub can_edit:      bool,
  pub created_at:    String,
  pub password_hash: Option<String>,
}

impl RawPerson {
  /// Map a row selected with [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:     row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      birth_date:    row.get(3)?,
      phone:         row.get(4)?,
      photo:         row.get(5)?,
      is_admin:      row.get(6)?,
      can_edit:      row.get(7)?,
      created_at:    row.get(8)?,
      password_hash: row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         decode_uuid(&self.person_id)?,
      name:       self.name,
      email:      self.email,
      birth_date: decode_birth_date(&self.person_id, &self.birth_date),
      phone:      self.phone,
      photo:      self.photo,
      is_admin:   self.is_admin,
      can_edit:   self.can_edit,
      created_at: decode_dt(&self.created_at)?,
    })
  }

  pub fn into_credentials(mut self) -> Result<AdminCredentials> {
    let password_hash = self.password_hash.take();
    Ok(AdminCredentials { person: self.into_person()?, password_hash })
  }
}
