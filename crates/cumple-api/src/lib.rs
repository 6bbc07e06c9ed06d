//! JSON REST API for the cumple birthday tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`cumple_core::store::BirthdayStore`]. TLS, CORS and request tracing are
//! the caller's responsibility.
//!
//! Every endpoint that depends on "today" asks the configured
//! [`Clock`] once per request. A `?today=YYYY-MM-DD` query parameter
//! overrides it.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cumple_api::api_router(store.clone(), clock))
//! ```

pub mod analytics;
pub mod auth;
pub mod birthdays;
pub mod calendar;
pub mod error;
pub mod greetings;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use cumple_core::{CalendarDate, clock::Clock, store::BirthdayStore};
use serde_json::{Value, json};

pub use error::ApiError;

/// Shared handler state: the record store and the source of "today".
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

impl<S> ApiState<S> {
  /// The reference date for one request: the `today` override if present,
  /// otherwise the clock.
  pub(crate) fn reference_date(
    &self,
    today: Option<&str>,
  ) -> Result<CalendarDate, ApiError> {
    match today.map(str::trim).filter(|t| !t.is_empty()) {
      Some(raw) => {
        let date: CalendarDate = raw.parse()?;
        date.to_naive()?;
        Ok(date)
      }
      None => Ok(self.clock.today_date()),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Router<()>
where
  S: BirthdayStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    // People
    .route(
      "/birthdays",
      get(birthdays::list::<S>).post(birthdays::create::<S>),
    )
    .route(
      "/birthdays/{id}",
      get(birthdays::get_one::<S>)
        .put(birthdays::update::<S>)
        .delete(birthdays::delete::<S>),
    )
    // Dashboard buckets
    .route("/birthdays/today", get(calendar::today::<S>))
    .route("/birthdays/upcoming", get(calendar::upcoming::<S>))
    .route("/birthdays/this-month", get(calendar::this_month::<S>))
    .route("/birthdays/calendar", get(calendar::all::<S>))
    // Greetings
    .route("/birthdays/{id}/greeting", get(greetings::handler::<S>))
    // Analytics
    .route("/analytics", get(analytics::handler::<S>))
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/change-password", post(auth::change_password::<S>))
    .with_state(ApiState { store, clock })
}

/// `GET /health`
async fn health() -> Json<Value> {
  Json(json!({ "status": "OK", "message": "Birthday API is running" }))
}
