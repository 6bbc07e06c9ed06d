//! `GET /analytics[?today=YYYY-MM-DD]`: aggregate counts for the dashboard.

use axum::{
  Json,
  extract::{Query, State},
};
use cumple_core::{
  analytics::{Summary, summarize},
  store::BirthdayStore,
};

use crate::{ApiState, calendar::{DateParams, classified}, error::ApiError};

pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DateParams>,
) -> Result<Json<Summary>, ApiError>
where
  S: BirthdayStore,
{
  let date = state.reference_date(params.today.as_deref())?;
  let c = classified(&state, date).await?;
  Ok(Json(summarize(&c)))
}
