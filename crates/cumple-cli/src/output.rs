//! Plain-text rendering of API responses.

use cumple_core::{engine::BirthdayEntry, person::Person};

use crate::client::{Bucket, Greeting};

pub fn person_line(p: &Person) -> String {
  let admin = if p.is_admin { "  [admin]" } else { "" };
  format!("{}  {:<24} {}  {}{admin}", p.id, p.name, p.birth_date, p.email)
}

pub fn entry_line(e: &BirthdayEntry) -> String {
  let name = &e.person.name;
  let turning = e.occurrence.turning;
  match e.occurrence.days_until {
    0 => format!("🎂 {name} turns {turning} today"),
    1 => format!("   {name} turns {turning} tomorrow ({})", e.occurrence.next_occurrence),
    n => format!(
      "   {name} turns {turning} in {n} days ({})",
      e.occurrence.next_occurrence
    ),
  }
}

/// A bucket with a header, or `empty` when there is nobody in it.
pub fn bucket(title: &str, b: &Bucket, empty: &str) -> String {
  let mut out = format!("{title} (as of {})\n", b.reference_date);
  if b.birthdays.is_empty() {
    out.push_str(empty);
    out.push('\n');
  }
  for e in &b.birthdays {
    out.push_str(&entry_line(e));
    out.push('\n');
  }
  for s in &b.skipped {
    out.push_str(&format!("   ! skipped {} ({}): {}\n", s.name, s.id, s.reason));
  }
  out
}

pub fn greeting(g: &Greeting) -> String {
  let mut out = format!("{}\n\n", g.message);
  for (channel, link) in &g.links {
    if let Some(link) = link {
      out.push_str(&format!("{channel:<9} {link}\n"));
    }
  }
  out
}
