//! [`CalendarDate`]: a timezone-less (year, month, day) triple.
//!
//! Birth dates are calendar data, not instants. They are never turned into a
//! date-with-time, so no timezone or daylight-saving shift can move them.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

/// A calendar date without time of day or timezone.
///
/// Construction does not validate; [`CalendarDate::to_naive`] and
/// [`CalendarDate::validate_birth`] do. This lets a malformed stored record
/// reach the engine and be reported instead of failing the whole read.
///
/// Ordering is chronological (year, then month, then day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarDate {
  pub year:  i32,
  pub month: u32,
  pub day:   u32,
}

/// Years outside this range are rejected so age arithmetic can never
/// overflow and every accepted date renders as `YYYY-MM-DD`.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
  (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

impl CalendarDate {
  /// Stand-in for a stored value that is not `YYYY-MM-DD` at all. It fails
  /// every validation, so the engine skips the record like any other
  /// invalid date.
  pub const UNREADABLE: CalendarDate = CalendarDate::new(0, 0, 0);

  pub const fn new(year: i32, month: u32, day: u32) -> Self {
    Self { year, month, day }
  }

  /// The `(month, day)` pair, for calendar-order comparisons that ignore
  /// the year.
  pub fn month_day(&self) -> (u32, u32) { (self.month, self.day) }

  pub fn is_feb_29(&self) -> bool { self.month == 2 && self.day == 29 }

  /// Convert to a [`NaiveDate`], failing with [`Error::InvalidDate`] unless
  /// the triple names a real day.
  pub fn to_naive(self) -> Result<NaiveDate> {
    if !YEAR_RANGE.contains(&self.year) {
      return Err(Error::InvalidDate(self.to_string()));
    }
    NaiveDate::from_ymd_opt(self.year, self.month, self.day)
      .ok_or_else(|| Error::InvalidDate(self.to_string()))
  }

  /// Validate the triple as a birth date.
  ///
  /// Same as [`CalendarDate::to_naive`] except that Feb 29 is accepted in
  /// any year: only the month and day recur, and the year is only used for
  /// age arithmetic.
  pub fn validate_birth(&self) -> Result<()> {
    let month_day_ok = NaiveDate::from_ymd_opt(2000, self.month, self.day).is_some();
    if YEAR_RANGE.contains(&self.year) && month_day_ok {
      Ok(())
    } else {
      Err(Error::InvalidDate(self.to_string()))
    }
  }
}

impl From<NaiveDate> for CalendarDate {
  fn from(d: NaiveDate) -> Self { Self::new(d.year(), d.month(), d.day()) }
}

impl fmt::Display for CalendarDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
  }
}

/// Parses the `YYYY-MM-DD` shape. Only the shape is checked here; range
/// checks belong to [`CalendarDate::to_naive`] and
/// [`CalendarDate::validate_birth`].
impl FromStr for CalendarDate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let malformed = || Error::InvalidDate(format!("{s:?} is not YYYY-MM-DD"));

    let mut parts = s.trim().splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next())
    else {
      return Err(malformed());
    };

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if y.len() != 4 || !all_digits(y) || !all_digits(m) || !all_digits(d) {
      return Err(malformed());
    }

    Ok(Self {
      year:  y.parse().map_err(|_| malformed())?,
      month: m.parse().map_err(|_| malformed())?,
      day:   d.parse().map_err(|_| malformed())?,
    })
  }
}

impl Serialize for CalendarDate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for CalendarDate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
  }
}
