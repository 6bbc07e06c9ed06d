//! Daily birthday check.
//!
//! One tokio task sleeps until the configured local time, reads the clock,
//! classifies every record and hands the "today" bucket to a [`Notifier`].
//! A failed run is logged and the loop carries on to the next day.

use std::sync::Arc;

use anyhow::Context as _;
use chrono::{Days, Local, NaiveDateTime, NaiveTime};
use cumple_core::{clock::Clock, engine::classify, store::BirthdayStore};

use crate::notifier::Notifier;

/// The first instant strictly after `now` whose time of day is `at`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
  let today = now.date().and_time(at);
  if today > now {
    return today;
  }
  match now.date().checked_add_days(Days::new(1)) {
    Some(tomorrow) => tomorrow.and_time(at),
    None => today,
  }
}

/// Classify everyone against the clock's date and notify about today's
/// birthdays. Returns how many there were.
pub async fn run_once<S>(
  store: &S,
  clock: &dyn Clock,
  notifier: &dyn Notifier,
) -> anyhow::Result<usize>
where
  S: BirthdayStore,
{
  let today = clock.today_date();
  let people = store.list().await.context("failed to load birthdays")?;
  let classification = classify(people, today)?;

  for skipped in classification.skipped() {
    tracing::warn!(
      id = %skipped.id,
      name = %skipped.name,
      reason = %skipped.reason,
      "skipping record"
    );
  }

  let birthdays = classification.today();
  notifier.notify(classification.reference_date(), &birthdays);
  Ok(birthdays.len())
}

/// Run forever, once a day at `at` local time.
pub async fn run<S>(
  store: Arc<S>,
  clock: Arc<dyn Clock>,
  notifier: Arc<dyn Notifier>,
  at: NaiveTime,
) where
  S: BirthdayStore,
{
  loop {
    let now = Local::now().naive_local();
    let next = next_run_after(now, at);
    tracing::debug!(%next, "next birthday check scheduled");
    let wait = (next - now).to_std().unwrap_or_default();
    tokio::time::sleep(wait).await;

    match run_once(store.as_ref(), clock.as_ref(), notifier.as_ref()).await {
      Ok(count) => tracing::info!(count, "daily birthday check finished"),
      Err(e) => tracing::error!(error = %e, "daily birthday check failed"),
    }
  }
}
