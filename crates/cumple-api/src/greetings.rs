//! `GET /birthdays/{id}/greeting`: render a greeting for one person along
//! with share links for it.
//!
//! Query parameters: `kind`, `tone`, `variant` and, for `kind=custom`,
//! `prompt`. All are optional.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cumple_core::{
  greeting::{GreetingRequest, compose},
  share::{ShareLinks, share_links},
  store::BirthdayStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
  pub message: String,
  pub links:   ShareLinks,
}

pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Query(request): Query<GreetingRequest>,
) -> Result<Json<GreetingResponse>, ApiError>
where
  S: BirthdayStore,
{
  let person = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("birthday {id} not found")))?;

  let message = compose(Some(&person.name), &request)?;
  let links = share_links(&person, &message);
  Ok(Json(GreetingResponse { message, links }))
}
