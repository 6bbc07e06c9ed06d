//! Dashboard bucket endpoints. Each request classifies the whole record set
//! against one reference date.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/birthdays/today` | Birthdays falling on the reference date |
//! | `GET`  | `/birthdays/upcoming` | `?days=N` (default 30), soonest first |
//! | `GET`  | `/birthdays/this-month` | Born in the reference month |
//! | `GET`  | `/birthdays/calendar` | Everyone, by month and day |
//!
//! All accept `?today=YYYY-MM-DD`. Records with invalid birth dates are
//! listed under `skipped` instead of failing the request.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use cumple_core::{
  CalendarDate,
  engine::{BirthdayEntry, Classification, DEFAULT_UPCOMING_DAYS, SkippedRecord, classify},
  store::BirthdayStore,
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
  pub today: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingParams {
  pub today: Option<String>,
  pub days:  Option<u32>,
}

/// One dashboard bucket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResponse {
  pub reference_date: NaiveDate,
  pub birthdays:      Vec<BirthdayEntry>,
  pub skipped:        Vec<SkippedRecord>,
}

impl BucketResponse {
  fn new(c: &Classification, bucket: Vec<&BirthdayEntry>) -> Self {
    Self {
      reference_date: c.reference_date(),
      birthdays:      bucket.into_iter().cloned().collect(),
      skipped:        c.skipped().to_vec(),
    }
  }
}

/// Load every record and classify it against `today`.
pub(crate) async fn classified<S>(
  state: &ApiState<S>,
  today: CalendarDate,
) -> Result<Classification, ApiError>
where
  S: BirthdayStore,
{
  let people = state.store.list().await.map_err(ApiError::store)?;
  let classification = classify(people, today)?;
  for skipped in classification.skipped() {
    tracing::warn!(
      id = %skipped.id,
      name = %skipped.name,
      reason = %skipped.reason,
      "skipping record"
    );
  }
  Ok(classification)
}

/// `GET /birthdays/today`
pub async fn today<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DateParams>,
) -> Result<Json<BucketResponse>, ApiError>
where
  S: BirthdayStore,
{
  let date = state.reference_date(params.today.as_deref())?;
  let c = classified(&state, date).await?;
  Ok(Json(BucketResponse::new(&c, c.today())))
}

/// `GET /birthdays/upcoming[?days=N]`
pub async fn upcoming<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<UpcomingParams>,
) -> Result<Json<BucketResponse>, ApiError>
where
  S: BirthdayStore,
{
  let date = state.reference_date(params.today.as_deref())?;
  let days = params.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
  let c = classified(&state, date).await?;
  Ok(Json(BucketResponse::new(&c, c.upcoming(days))))
}

/// `GET /birthdays/this-month`
pub async fn this_month<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DateParams>,
) -> Result<Json<BucketResponse>, ApiError>
where
  S: BirthdayStore,
{
  let date = state.reference_date(params.today.as_deref())?;
  let c = classified(&state, date).await?;
  Ok(Json(BucketResponse::new(&c, c.this_month())))
}

/// `GET /birthdays/calendar`
pub async fn all<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DateParams>,
) -> Result<Json<BucketResponse>, ApiError>
where
  S: BirthdayStore,
{
  let date = state.reference_date(params.today.as_deref())?;
  let c = classified(&state, date).await?;
  Ok(Json(BucketResponse::new(&c, c.all())))
}
