//! The `BirthdayStore` trait, the record store behind the API.
//!
//! The trait is implemented by storage backends (e.g. `cumple-store-sqlite`).
//! Higher layers (`cumple-api`, `cumple-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::person::{NewPerson, Person};

/// A person record together with its stored password hash.
///
/// Only returned by the admin lookups; never serialised.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
  pub person:        Person,
  /// Argon2 PHC string, or `None` if no password was ever set.
  pub password_hash: Option<String>,
}

/// Abstraction over a birthday record store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait BirthdayStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether `error` is the rejection of a write that would leave two admins.
  fn is_admin_conflict(error: &Self::Error) -> bool;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new person. `id`, `created_at` and `can_edit = true` are set
  /// by the store. At most one admin may exist.
  fn create(
    &self,
    input: NewPerson,
    password_hash: Option<String>,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All people, ordered by birth date (oldest first).
  fn list(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Replace every editable field of a person and clear `can_edit`.
  /// Returns `None` if the person does not exist.
  fn update(
    &self,
    id: Uuid,
    input: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person. Returns `false` if nothing was deleted.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Admin ─────────────────────────────────────────────────────────────

  fn count_admins(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Find the admin whose email or name equals `login`.
  fn find_admin<'a>(
    &'a self,
    login: &'a str,
  ) -> impl Future<Output = Result<Option<AdminCredentials>, Self::Error>> + Send + 'a;

  /// Fetch credentials for `id`, only if that person is an admin.
  fn get_admin(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AdminCredentials>, Self::Error>> + Send + '_;

  /// Replace the stored password hash. Returns `false` if `id` is unknown.
  fn set_password_hash(
    &self,
    id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
