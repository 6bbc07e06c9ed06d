//! Aggregate statistics over a [`Classification`], as shown on the analytics
//! view.

use serde::Serialize;

use crate::engine::{BirthdayEntry, Classification, DEFAULT_UPCOMING_DAYS};

// ─── Age groups ──────────────────────────────────────────────────────────────

/// Coarse age bracket. Upper bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeGroup {
  #[serde(rename = "0-20")]
  UpTo20,
  #[serde(rename = "21-40")]
  From21To40,
  #[serde(rename = "41-60")]
  From41To60,
  #[serde(rename = "60+")]
  Over60,
}

impl AgeGroup {
  pub const ALL: [AgeGroup; 4] =
    [Self::UpTo20, Self::From21To40, Self::From41To60, Self::Over60];

  pub fn of(age: u32) -> Self {
    match age {
      0..=20 => Self::UpTo20,
      21..=40 => Self::From21To40,
      41..=60 => Self::From41To60,
      _ => Self::Over60,
    }
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
  /// 1 = January.
  pub month: u32,
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeGroupCount {
  pub range: AgeGroup,
  pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  /// Number of classified people; skipped records are not included.
  pub total:              usize,
  /// Mean age rounded to the nearest year; `0` when there is nobody.
  pub average_age:        u32,
  pub this_month:         usize,
  /// Birthdays within [`DEFAULT_UPCOMING_DAYS`], today included.
  pub upcoming:           usize,
  pub monthly:            Vec<MonthCount>,
  pub age_groups:         Vec<AgeGroupCount>,
  pub upcoming_birthdays: Vec<BirthdayEntry>,
  pub skipped:            usize,
}

/// Build the analytics summary for a classified batch.
pub fn summarize(classification: &Classification) -> Summary {
  let entries = classification.entries();

  let mut monthly = [0usize; 12];
  let mut groups = [0usize; 4];
  let mut age_sum: u64 = 0;
  for e in entries {
    if let Some(slot) = monthly.get_mut(e.person.birth_date.month as usize - 1) {
      *slot += 1;
    }
    let group = AgeGroup::of(e.occurrence.age);
    if let Some(i) = AgeGroup::ALL.iter().position(|g| *g == group) {
      groups[i] += 1;
    }
    age_sum += u64::from(e.occurrence.age);
  }

  let average_age = if entries.is_empty() {
    0
  } else {
    (age_sum as f64 / entries.len() as f64).round() as u32
  };

  let mut upcoming_birthdays: Vec<BirthdayEntry> = entries
    .iter()
    .filter(|e| e.occurrence.days_until <= i64::from(DEFAULT_UPCOMING_DAYS))
    .cloned()
    .collect();
  upcoming_birthdays.sort_by(|a, b| {
    a.occurrence
      .days_until
      .cmp(&b.occurrence.days_until)
      .then_with(|| a.person.name.cmp(&b.person.name))
  });

  Summary {
    total: entries.len(),
    average_age,
    this_month: classification.this_month().len(),
    upcoming: upcoming_birthdays.len(),
    monthly: (1..=12)
      .zip(monthly)
      .map(|(month, count)| MonthCount { month, count })
      .collect(),
    age_groups: AgeGroup::ALL
      .into_iter()
      .zip(groups)
      .map(|(range, count)| AgeGroupCount { range, count })
      .collect(),
    upcoming_birthdays,
    skipped: classification.skipped().len(),
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use uuid::Uuid;

  use super::*;
  use crate::{CalendarDate, engine::classify, person::Person};

  fn person(name: &str, birth_date: CalendarDate) -> Person {
    Person {
      id: Uuid::new_v4(),
      name: name.into(),
      email: "x@example.com".into(),
      birth_date,
      phone: None,
      photo: None,
      is_admin: false,
      can_edit: true,
      created_at: Utc.timestamp_opt(0, 0).unwrap(),
    }
  }

  #[test]
  fn age_group_bounds_are_inclusive() {
    assert_eq!(AgeGroup::of(20), AgeGroup::UpTo20);
    assert_eq!(AgeGroup::of(21), AgeGroup::From21To40);
    assert_eq!(AgeGroup::of(60), AgeGroup::From41To60);
    assert_eq!(AgeGroup::of(61), AgeGroup::Over60);
  }

  #[test]
  fn summary_counts() {
    let today = CalendarDate::new(2024, 3, 10);
    let c = classify(
      [
        person("Today", CalendarDate::new(2000, 3, 10)),
        person("Soon", CalendarDate::new(1990, 3, 15)),
        person("Later", CalendarDate::new(1950, 7, 1)),
        person("Broken", CalendarDate::new(1990, 2, 30)),
      ],
      today,
    )
    .unwrap();

    let s = summarize(&c);
    assert_eq!(s.total, 3);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.this_month, 2);
    assert_eq!(s.upcoming, 2);
    assert_eq!(s.upcoming_birthdays[0].person.name, "Today");
    assert_eq!(s.upcoming_birthdays[1].person.name, "Soon");
    // Ages: 24, 33, 73 → mean 43.33
    assert_eq!(s.average_age, 43);
    assert_eq!(s.monthly[2], MonthCount { month: 3, count: 2 });
    assert_eq!(s.monthly[6], MonthCount { month: 7, count: 1 });
    assert_eq!(s.age_groups[0].count, 0);
    assert_eq!(s.age_groups[1].count, 2);
    assert_eq!(s.age_groups[3].count, 1);
  }

  #[test]
  fn empty_summary() {
    let c = classify(Vec::<Person>::new(), CalendarDate::new(2024, 1, 1)).unwrap();
    let s = summarize(&c);
    assert_eq!(s.total, 0);
    assert_eq!(s.average_age, 0);
    assert_eq!(s.monthly.len(), 12);
  }

  #[test]
  fn age_group_serializes_as_range_label() {
    let json = serde_json::to_value(AgeGroup::Over60).unwrap();
    assert_eq!(json, "60+");
  }
}
