//! Server configuration, read from `config.toml` and `CUMPLE_*` variables.
//!
//! ```toml
//! host       = "0.0.0.0"
//! port       = 3001
//! store_path = "~/.local/share/cumple/birthdays.db"
//!
//! # Daily notification run, local time.
//! notify_hour   = 9
//! notify_minute = 0
//!
//! # Created at startup when no admin exists yet.
//! [admin]
//! name       = "Admin"
//! email      = "admin@example.com"
//! birth_date = "1980-01-01"
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `CUMPLE_ADMIN__EMAIL`.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveTime;
use cumple_core::CalendarDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default = "default_notify_hour")]
  pub notify_hour:   u32,
  #[serde(default)]
  pub notify_minute: u32,
  #[serde(default)]
  pub admin:         Option<AdminSeed>,
}

/// The admin created on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
  pub name:       String,
  pub email:      String,
  pub birth_date: CalendarDate,
  /// Falls back to the birth date as `DD/MM/YYYY`.
  #[serde(default)]
  pub password:   Option<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 3001 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/cumple/birthdays.db") }

fn default_notify_hour() -> u32 { 9 }

impl ServerConfig {
  /// Layer the optional config file under the environment.
  pub fn load(path: PathBuf) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CUMPLE").separator("__"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  /// Local time of the daily notification run.
  pub fn notify_at(&self) -> anyhow::Result<NaiveTime> {
    NaiveTime::from_hms_opt(self.notify_hour, self.notify_minute, 0).with_context(|| {
      format!(
        "invalid notification time {:02}:{:02}",
        self.notify_hour, self.notify_minute
      )
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(src: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(src, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.port, 3001);
    assert_eq!(cfg.notify_at().unwrap(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert!(cfg.admin.is_none());
  }

  #[test]
  fn admin_seed_is_parsed() {
    let cfg = from_toml(
      r#"
        port = 8080
        notify_hour = 7
        notify_minute = 30

        [admin]
        name = "Root"
        email = "root@example.com"
        birth_date = "1980-07-04"
      "#,
    );
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.notify_at().unwrap(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
    let admin = cfg.admin.unwrap();
    assert_eq!(admin.birth_date, CalendarDate::new(1980, 7, 4));
    assert!(admin.password.is_none());
  }

  #[test]
  fn out_of_range_time_is_an_error() {
    let cfg = from_toml("notify_hour = 24");
    assert!(cfg.notify_at().is_err());
  }
}
