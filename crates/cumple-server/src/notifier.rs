//! Where the daily "birthdays today" list goes.

use chrono::NaiveDate;
use cumple_core::engine::BirthdayEntry;

pub trait Notifier: Send + Sync {
  /// Called once per scheduled run, even when `birthdays` is empty.
  fn notify(&self, date: NaiveDate, birthdays: &[&BirthdayEntry]);
}

/// Writes one `tracing` event per birthday.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
  fn notify(&self, date: NaiveDate, birthdays: &[&BirthdayEntry]) {
    if birthdays.is_empty() {
      tracing::info!(%date, "no birthdays today");
      return;
    }
    tracing::info!(%date, count = birthdays.len(), "birthdays today");
    for entry in birthdays {
      tracing::info!(
        name = %entry.person.name,
        email = %entry.person.email,
        age = entry.occurrence.age,
        "🎉 birthday: {} turns {}",
        entry.person.name,
        entry.occurrence.turning
      );
    }
  }
}
