//! Person records as kept by the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CalendarDate, Error, Result};

/// A person whose birthday is tracked.
///
/// The engine only reads `name` and `birth_date`; the remaining fields belong
/// to the store, the UI and the access-control layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  /// Assigned by the store at creation; never changes.
  pub id:         Uuid,
  pub name:       String,
  pub email:      String,
  pub birth_date: CalendarDate,
  pub phone:      Option<String>,
  /// Opaque URI or data URI; never interpreted server-side.
  pub photo:      Option<String>,
  pub is_admin:   bool,
  /// Cleared once the record has been edited.
  pub can_edit:   bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::BirthdayStore::create`] and
/// [`crate::store::BirthdayStore::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
  pub name:       String,
  pub email:      String,
  pub birth_date: CalendarDate,
  #[serde(default)]
  pub phone:      Option<String>,
  #[serde(default)]
  pub photo:      Option<String>,
  #[serde(default)]
  pub is_admin:   bool,
}

impl NewPerson {
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    birth_date: CalendarDate,
  ) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      birth_date,
      phone: None,
      photo: None,
      is_admin: false,
    }
  }

  /// Check the fields the store relies on: a non-empty name, a plausible
  /// email address and a real birth date.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::MissingField("email"));
    }
    validate_email(&self.email)?;
    self.birth_date.validate_birth()
  }

  /// Blank optional strings are stored as `None`.
  pub fn normalized(mut self) -> Self {
    self.name = self.name.trim().to_owned();
    self.email = self.email.trim().to_owned();
    self.phone = self.phone.filter(|p| !p.trim().is_empty());
    self.photo = self.photo.filter(|p| !p.trim().is_empty());
    self
  }
}

/// Syntactic email check: exactly one `@`, a non-empty local part, and a
/// dotted domain without whitespace.
pub fn validate_email(email: &str) -> Result<()> {
  let invalid = || Error::InvalidEmail(email.to_owned());
  let email = email.trim();

  if email.chars().any(char::is_whitespace) {
    return Err(invalid());
  }
  let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
  if local.is_empty() || domain.contains('@') {
    return Err(invalid());
  }
  let labels_ok = domain.split('.').count() >= 2 && domain.split('.').all(|l| !l.is_empty());
  if !labels_ok {
    return Err(invalid());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> NewPerson {
    NewPerson::new("Alice", "alice@example.com", CalendarDate::new(1990, 3, 15))
  }

  #[test]
  fn valid_input_passes() {
    assert!(alice().validate().is_ok());
  }

  #[test]
  fn blank_name_is_missing() {
    let mut p = alice();
    p.name = "   ".into();
    assert_eq!(p.validate(), Err(Error::MissingField("name")));
  }

  #[test]
  fn bad_email_is_rejected() {
    for bad in ["alice", "@example.com", "alice@", "alice@example", "a b@example.com", "a@b@c.com"] {
      assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
    }
    assert!(validate_email("a.b+tag@mail.example.org").is_ok());
  }

  #[test]
  fn impossible_birth_date_is_rejected() {
    let mut p = alice();
    p.birth_date = CalendarDate::new(1990, 2, 30);
    assert!(matches!(p.validate(), Err(Error::InvalidDate(_))));
  }

  #[test]
  fn normalized_drops_blank_optionals() {
    let mut p = alice();
    p.phone = Some("  ".into());
    p.photo = Some("data:image/png;base64,AAAA".into());
    p.name = " Alice ".into();
    let p = p.normalized();
    assert_eq!(p.name, "Alice");
    assert_eq!(p.phone, None);
    assert!(p.photo.is_some());
  }

  #[test]
  fn wire_format_is_camel_case() {
    let json = serde_json::json!({
      "name": "Bob",
      "email": "bob@example.com",
      "birthDate": "1985-03-01",
      "isAdmin": true
    });
    let p: NewPerson = serde_json::from_value(json).unwrap();
    assert_eq!(p.birth_date, CalendarDate::new(1985, 3, 1));
    assert!(p.is_admin);
    assert_eq!(p.phone, None);
  }
}
