//! `cumple`: command-line client for the cumple birthday server.
//!
//! # Usage
//!
//! ```
//! cumple --url http://localhost:3001 today
//! cumple upcoming --days 14
//! cumple add --name Alice --email alice@example.com --birth-date 1990-03-15
//! cumple --config ~/.config/cumple/config.toml list
//! ```

mod client;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, GreetingQuery};
use cumple_core::{CalendarDate, engine::DEFAULT_UPCOMING_DAYS, person::NewPerson};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:3001";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cumple", about = "Keep track of birthdays")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the cumple server (default: http://localhost:3001).
  #[arg(long, env = "CUMPLE_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every record, oldest first.
  List,
  /// Show today's birthdays.
  Today {
    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// Show birthdays in the next few days.
  Upcoming {
    #[arg(short, long, default_value_t = DEFAULT_UPCOMING_DAYS)]
    days: u32,
    /// Pretend today is this date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<NaiveDate>,
  },
  /// Add a person.
  Add {
    #[arg(long)]
    name:       String,
    #[arg(long)]
    email:      String,
    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: CalendarDate,
    #[arg(long)]
    phone:      Option<String>,
  },
  /// Remove a person by id.
  Remove { id: Uuid },
  /// Compose a greeting for a person and print share links.
  Greet {
    id:      Uuid,
    /// birthday, anniversary, congratulations, thankyou or custom.
    #[arg(long)]
    kind:    Option<String>,
    /// friendly, formal, funny, emotional or professional.
    #[arg(long)]
    tone:    Option<String>,
    #[arg(long)]
    variant: Option<usize>,
    /// Text for a custom greeting.
    #[arg(long)]
    prompt:  Option<String>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// Flag (or `CUMPLE_URL`) wins over the file, which wins over the default.
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_url(args.url, &file_cfg))?;

  match args.command {
    Command::List => {
      let people = client.list().await?;
      if people.is_empty() {
        println!("No birthdays yet.");
      }
      for p in &people {
        println!("{}", output::person_line(p));
      }
    }
    Command::Today { date } => {
      let b = client.today(date).await?;
      print!("{}", output::bucket("Today", &b, "No birthdays today."));
    }
    Command::Upcoming { days, date } => {
      let b = client.upcoming(days, date).await?;
      let title = format!("Next {days} days");
      print!("{}", output::bucket(&title, &b, "Nothing coming up."));
    }
    Command::Add { name, email, birth_date, phone } => {
      let mut input = NewPerson::new(name, email, birth_date);
      input.phone = phone;
      let person = client.add(&input).await?;
      println!("Added {}", output::person_line(&person));
    }
    Command::Remove { id } => {
      client.remove(id).await?;
      println!("Removed {id}");
    }
    Command::Greet { id, kind, tone, variant, prompt } => {
      let query = GreetingQuery { kind, tone, variant, prompt };
      let g = client.greeting(id, &query).await?;
      print!("{}", output::greeting(&g));
    }
  }

  Ok(())
}
