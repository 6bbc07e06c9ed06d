//! Handlers for `/birthdays` record endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/birthdays` | All records, oldest birth date first |
//! | `POST`   | `/birthdays` | 201; 400 on validation failure or second admin |
//! | `GET`    | `/birthdays/{id}` | 404 if not found |
//! | `PUT`    | `/birthdays/{id}` | Full replacement; clears `canEdit` |
//! | `DELETE` | `/birthdays/{id}` | 204; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cumple_core::{
  CalendarDate, Error,
  person::{NewPerson, Person},
  store::BirthdayStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, auth, error::ApiError};

// ─── Body ─────────────────────────────────────────────────────────────────────

/// Request body for create and update. Every field is optional at the wire
/// level so that missing fields produce a 400 with a readable message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonBody {
  pub name:       Option<String>,
  pub email:      Option<String>,
  pub birth_date: Option<String>,
  pub phone:      Option<String>,
  pub photo:      Option<String>,
  #[serde(default)]
  pub is_admin:   bool,
}

impl TryFrom<PersonBody> for NewPerson {
  type Error = ApiError;

  fn try_from(body: PersonBody) -> Result<Self, ApiError> {
    let name = body.name.ok_or(Error::MissingField("name"))?;
    let email = body.email.ok_or(Error::MissingField("email"))?;
    let birth_date: CalendarDate = body
      .birth_date
      .ok_or(Error::MissingField("birthDate"))?
      .parse()?;

    let input = NewPerson {
      name,
      email,
      birth_date,
      phone: body.phone,
      photo: body.photo,
      is_admin: body.is_admin,
    }
    .normalized();
    input.validate()?;
    Ok(input)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /birthdays`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: BirthdayStore,
{
  let people = state.store.list().await.map_err(ApiError::store)?;
  Ok(Json(people))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /birthdays`
///
/// A new admin gets a default password: the birth date as `DD/MM/YYYY`.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<PersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BirthdayStore,
{
  let input = NewPerson::try_from(body)?;

  let password_hash = if input.is_admin {
    Some(auth::hash_password(&auth::default_password(input.birth_date))?)
  } else {
    None
  };

  let person = state
    .store
    .create(input, password_hash)
    .await
    .map_err(write_error::<S>)?;
  tracing::info!(id = %person.id, name = %person.name, "birthday added");
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /birthdays/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: BirthdayStore,
{
  let person = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /birthdays/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PersonBody>,
) -> Result<Json<Person>, ApiError>
where
  S: BirthdayStore,
{
  let input = NewPerson::try_from(body)?;

  let person = state
    .store
    .update(id, input)
    .await
    .map_err(write_error::<S>)?
    .ok_or_else(|| not_found(id))?;
  tracing::info!(id = %person.id, "birthday updated");
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /birthdays/{id}`
pub async fn delete<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: BirthdayStore,
{
  let deleted = state.store.delete(id).await.map_err(ApiError::store)?;
  if !deleted {
    return Err(not_found(id));
  }
  tracing::info!(%id, "birthday deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> ApiError {
  ApiError::NotFound(format!("birthday {id} not found"))
}

/// Map a store write error. The store enforces the one-admin rule, and its
/// rejection is a 400.
fn write_error<S>(e: S::Error) -> ApiError
where
  S: BirthdayStore,
{
  if S::is_admin_conflict(&e) {
    ApiError::BadRequest("Admin already exists".into())
  } else {
    ApiError::store(e)
  }
}
