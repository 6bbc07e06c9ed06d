//! The birthday date engine: age, next occurrence, days until, and
//! classification of a batch of people into dashboard buckets.
//!
//! Every function here is pure. The reference date ("today") is always an
//! argument; nothing in this module reads a clock.
//!
//! # Feb 29
//!
//! A Feb 29 birthday falls on **Feb 28** in non-leap years. This keeps the
//! occurrence inside February instead of rolling over into March.
//!
//! # Invalid records
//!
//! [`classify`] skips records whose birth date is invalid (or lies after
//! the reference date) and reports them in [`Classification::skipped`]; the
//! rest of the batch is classified normally. An invalid reference date fails
//! the whole call.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  CalendarDate, Error, Result, date::is_leap_year, person::Person,
};

/// Window used by the dashboard and analytics "upcoming" panels.
pub const DEFAULT_UPCOMING_DAYS: u32 = 30;

// ─── Single-record computations ──────────────────────────────────────────────

/// Completed years of age as of `today`.
///
/// Fails with [`Error::InvalidDate`] if either date is malformed or if
/// `birth_date` is after `today`.
pub fn age_of(birth_date: CalendarDate, today: CalendarDate) -> Result<u32> {
  birth_date.validate_birth()?;
  today.to_naive()?;

  if birth_date > today {
    return Err(Error::InvalidDate(format!(
      "birth date {birth_date} is after reference date {today}"
    )));
  }

  let mut age = today.year - birth_date.year;
  if today.month_day() < birth_date.month_day() {
    age -= 1;
  }
  Ok(age as u32)
}

/// The date on which the birthday recurs in `year`.
fn occurrence_in(birth_date: CalendarDate, year: i32) -> Result<NaiveDate> {
  let (month, day) = if birth_date.is_feb_29() && !is_leap_year(year) {
    (2, 28)
  } else {
    birth_date.month_day()
  };
  NaiveDate::from_ymd_opt(year, month, day)
    .ok_or_else(|| Error::InvalidDate(birth_date.to_string()))
}

/// The first birthday on or after `today`.
pub fn next_occurrence(
  birth_date: CalendarDate,
  today: CalendarDate,
) -> Result<NaiveDate> {
  birth_date.validate_birth()?;
  let reference = today.to_naive()?;

  let this_year = occurrence_in(birth_date, reference.year())?;
  if this_year >= reference {
    Ok(this_year)
  } else {
    occurrence_in(birth_date, reference.year() + 1)
  }
}

/// Whole calendar days from `today` to the next birthday; `0` means today.
pub fn days_until(birth_date: CalendarDate, today: CalendarDate) -> Result<i64> {
  let next = next_occurrence(birth_date, today)?;
  Ok((next - today.to_naive()?).num_days())
}

// ─── AnnualOccurrence ────────────────────────────────────────────────────────

/// Values derived from a birth date and a reference date. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualOccurrence {
  pub age:             u32,
  pub next_occurrence: NaiveDate,
  pub days_until:      i64,
  /// The age reached on `next_occurrence`. On a clamped Feb 28 this is one
  /// more than `age`, which only rolls over on Mar 1.
  pub turning:         u32,
}

impl AnnualOccurrence {
  /// Compute all derived values in one pass.
  pub fn compute(birth_date: CalendarDate, today: CalendarDate) -> Result<Self> {
    let age = age_of(birth_date, today)?;
    let next_occurrence = next_occurrence(birth_date, today)?;
    let days_until = (next_occurrence - today.to_naive()?).num_days();
    let turning = (next_occurrence.year() - birth_date.year) as u32;
    Ok(Self { age, next_occurrence, days_until, turning })
  }
}

// ─── Classification ──────────────────────────────────────────────────────────

/// A person paired with their derived occurrence values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayEntry {
  #[serde(flatten)]
  pub person:     Person,
  #[serde(flatten)]
  pub occurrence: AnnualOccurrence,
}

/// A record left out of classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
  pub id:     Uuid,
  pub name:   String,
  pub reason: String,
}

/// The result of [`classify`]. Bucket accessors borrow from it; each bucket
/// is computed on request.
#[derive(Debug, Clone)]
pub struct Classification {
  reference: NaiveDate,
  /// Valid entries in input order.
  entries:   Vec<BirthdayEntry>,
  skipped:   Vec<SkippedRecord>,
}

impl Classification {
  pub fn reference_date(&self) -> NaiveDate { self.reference }

  /// Valid entries, input order preserved.
  pub fn entries(&self) -> &[BirthdayEntry] { &self.entries }

  pub fn skipped(&self) -> &[SkippedRecord] { &self.skipped }

  /// People whose birthday is today, in input order.
  pub fn today(&self) -> Vec<&BirthdayEntry> {
    self
      .entries
      .iter()
      .filter(|e| e.occurrence.days_until == 0)
      .collect()
  }

  /// People whose birthday is in `1..=within_days` days, soonest first.
  /// Equal distances are ordered by name.
  pub fn upcoming(&self, within_days: u32) -> Vec<&BirthdayEntry> {
    let mut out: Vec<&BirthdayEntry> = self
      .entries
      .iter()
      .filter(|e| {
        e.occurrence.days_until > 0
          && e.occurrence.days_until <= i64::from(within_days)
      })
      .collect();
    out.sort_by(|a, b| {
      a.occurrence
        .days_until
        .cmp(&b.occurrence.days_until)
        .then_with(|| a.person.name.cmp(&b.person.name))
    });
    out
  }

  /// People born in the reference month, regardless of day. Input order.
  pub fn this_month(&self) -> Vec<&BirthdayEntry> {
    let month = self.reference.month();
    self
      .entries
      .iter()
      .filter(|e| e.person.birth_date.month == month)
      .collect()
  }

  /// Everyone, in calendar order of (month, day), ignoring the year.
  pub fn all(&self) -> Vec<&BirthdayEntry> {
    let mut out: Vec<&BirthdayEntry> = self.entries.iter().collect();
    out.sort_by_key(|e| e.person.birth_date.month_day());
    out
  }
}

/// Derive occurrences for every person and group them relative to `today`.
///
/// Invalid records are skipped and reported; see the module docs.
pub fn classify<I>(people: I, today: CalendarDate) -> Result<Classification>
where
  I: IntoIterator<Item = Person>,
{
  let reference = today.to_naive()?;

  let mut entries = Vec::new();
  let mut skipped = Vec::new();
  for person in people {
    match AnnualOccurrence::compute(person.birth_date, today) {
      Ok(occurrence) => entries.push(BirthdayEntry { person, occurrence }),
      Err(e) => skipped.push(SkippedRecord {
        id:     person.id,
        name:   person.name,
        reason: e.to_string(),
      }),
    }
  }

  Ok(Classification { reference, entries, skipped })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
