//! Admin login and password change.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | `{"email","password"}`; email may also be the admin's name |
//! | `POST` | `/auth/change-password` | `{"userId","currentPassword","newPassword"}` |
//!
//! Passwords are stored as argon2 PHC strings. There are no sessions or
//! tokens; a successful login just returns the admin's record.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::State,
};
use cumple_core::{CalendarDate, person::Person, store::BirthdayStore};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Password helpers ─────────────────────────────────────────────────────────

/// The password an admin starts with: their birth date as `DD/MM/YYYY`.
pub fn default_password(birth_date: CalendarDate) -> String {
  format!(
    "{:02}/{:02}/{:04}",
    birth_date.day, birth_date.month, birth_date.year
  )
}

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// `false` for a wrong password or an unparsable hash.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub message: String,
  pub user:    Person,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: BirthdayStore,
{
  let login = required(body.email, "email")?;
  let password = required(body.password, "password")?;

  let creds = state
    .store
    .find_admin(login.trim())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Unauthorized("user not found or not an admin".into()))?;

  let ok = creds
    .password_hash
    .as_deref()
    .is_some_and(|phc| verify_password(&password, phc));
  if !ok {
    tracing::warn!(id = %creds.person.id, "failed admin login");
    return Err(ApiError::Unauthorized("incorrect password".into()));
  }

  tracing::info!(id = %creds.person.id, "admin logged in");
  Ok(Json(LoginResponse {
    message: "Login successful".into(),
    user:    creds.person,
  }))
}

// ─── Change password ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
  pub user_id:          Option<Uuid>,
  pub current_password: Option<String>,
  pub new_password:     Option<String>,
}

/// `POST /auth/change-password`
pub async fn change_password<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ChangePasswordBody>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: BirthdayStore,
{
  let user_id = body
    .user_id
    .ok_or_else(|| ApiError::BadRequest("userId is required".into()))?;
  let current = required(body.current_password, "currentPassword")?;
  let new = required(body.new_password, "newPassword")?;

  let creds = state
    .store
    .get_admin(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("admin {user_id} not found")))?;

  let ok = creds
    .password_hash
    .as_deref()
    .is_some_and(|phc| verify_password(&current, phc));
  if !ok {
    return Err(ApiError::Unauthorized("current password is incorrect".into()));
  }

  let hash = hash_password(&new)?;
  state
    .store
    .set_password_hash(user_id, hash)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(id = %user_id, "admin password changed");
  Ok(Json(serde_json::json!({ "message": "Password updated successfully" })))
}
