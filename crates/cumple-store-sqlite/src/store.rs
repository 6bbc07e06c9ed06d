//! [`SqliteStore`]: the SQLite implementation of [`BirthdayStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use cumple_core::{
  person::{NewPerson, Person},
  store::{AdminCredentials, BirthdayStore},
};

use crate::{
  Error, Result,
  encode::{PERSON_COLUMNS, RawPerson, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
};

/// What a guarded write did.
enum WriteOutcome {
  Written,
  Missing,
  AdminTaken,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A birthday record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
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

  /// Fetch one raw row by id, optionally restricted to admins.
  async fn fetch_raw(&self, id: Uuid, admin_only: bool) -> Result<Option<RawPerson>> {
    let id_str = encode_uuid(id);
    let sql = if admin_only {
      format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1 AND is_admin = 1")
    } else {
      format!("SELECT {PERSON_COLUMNS} FROM people WHERE person_id = ?1")
    };

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawPerson::from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }
}

#[cfg(test)]
impl SqliteStore {
  /// Run a statement directly, bypassing the domain encoders.
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<usize> {
    Ok(self.conn.call(move |conn| Ok(conn.execute(sql, [])?)).await?)
  }
}

/// Count admins other than `except`.
fn other_admins(conn: &rusqlite::Connection, except: &str) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM people WHERE is_admin = 1 AND person_id != ?1",
    rusqlite::params![except],
    |r| r.get(0),
  )
}

// ─── BirthdayStore impl ──────────────────────────────────────────────────────

impl BirthdayStore for SqliteStore {
  type Error = Error;

  fn is_admin_conflict(error: &Error) -> bool { matches!(error, Error::AdminExists) }

  async fn create(
    &self,
    input: NewPerson,
    password_hash: Option<String>,
  ) -> Result<Person> {
    let person = Person {
      id:         Uuid::new_v4(),
      name:       input.name,
      email:      input.email,
      birth_date: input.birth_date,
      phone:      input.phone,
      photo:      input.photo,
      is_admin:   input.is_admin,
      can_edit:   true,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(person.id);
    let name       = person.name.clone();
    let email      = person.email.clone();
    let birth_str  = encode_date(person.birth_date);
    let phone      = person.phone.clone();
    let photo      = person.photo.clone();
    let is_admin   = person.is_admin;
    let created_at = encode_dt(person.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        if is_admin && other_admins(conn, &id_str)? > 0 {
          return Ok(WriteOutcome::AdminTaken);
        }
        conn.execute(
          "INSERT INTO people (
             person_id, name, email, birth_date, phone, photo,
             is_admin, can_edit, password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)",
          rusqlite::params![
            id_str,
            name,
            email,
            birth_str,
            phone,
            photo,
            is_admin,
            password_hash,
            created_at,
          ],
        )?;
        Ok(WriteOutcome::Written)
      })
      .await?;

    match outcome {
      WriteOutcome::AdminTaken => Err(Error::AdminExists),
      _ => {
        tracing::debug!(id = %person.id, "person created");
        Ok(person)
      }
    }
  }

  async fn get(&self, id: Uuid) -> Result<Option<Person>> {
    self
      .fetch_raw(id, false)
      .await?
      .map(RawPerson::into_person)
      .transpose()
  }

  async fn list(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM people ORDER BY birth_date, name"
        ))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn update(&self, id: Uuid, input: NewPerson) -> Result<Option<Person>> {
    let id_str    = encode_uuid(id);
    let birth_str = encode_date(input.birth_date);
    let is_admin  = input.is_admin;

    let outcome = self
      .conn
      .call(move |conn| {
        if is_admin && other_admins(conn, &id_str)? > 0 {
          return Ok(WriteOutcome::AdminTaken);
        }
        let changed = conn.execute(
          "UPDATE people
             SET name = ?1, email = ?2, birth_date = ?3, phone = ?4,
                 photo = ?5, is_admin = ?6, can_edit = 0
           WHERE person_id = ?7",
          rusqlite::params![
            input.name,
            input.email,
            birth_str,
            input.phone,
            input.photo,
            is_admin,
            id_str,
          ],
        )?;
        Ok(if changed == 0 { WriteOutcome::Missing } else { WriteOutcome::Written })
      })
      .await?;

    match outcome {
      WriteOutcome::AdminTaken => Err(Error::AdminExists),
      WriteOutcome::Missing => Ok(None),
      WriteOutcome::Written => self.get(id).await,
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  async fn count_admins(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM people WHERE is_admin = 1",
          [],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as usize)
  }

  async fn find_admin(&self, login: &str) -> Result<Option<AdminCredentials>> {
    let login = login.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERSON_COLUMNS} FROM people
                 WHERE (email = ?1 OR name = ?1) AND is_admin = 1"
              ),
              rusqlite::params![login],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_credentials).transpose()
  }

  async fn get_admin(&self, id: Uuid) -> Result<Option<AdminCredentials>> {
    self
      .fetch_raw(id, true)
      .await?
      .map(RawPerson::into_credentials)
      .transpose()
  }

  async fn set_password_hash(&self, id: Uuid, password_hash: String) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET password_hash = ?1 WHERE person_id = ?2",
          rusqlite::params![password_hash, id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}
