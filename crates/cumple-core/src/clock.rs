//! Where "today" comes from.
//!
//! The engine never reads the system clock. Request handlers and the daily
//! scheduler ask a [`Clock`] once per invocation and pass the date down.

use chrono::{Local, NaiveDate};

use crate::CalendarDate;

pub trait Clock: Send + Sync {
  /// The current calendar date.
  fn today(&self) -> NaiveDate;

  fn today_date(&self) -> CalendarDate { CalendarDate::from(self.today()) }
}

/// The host's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.0 }
}
