//! cumple server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, seeds the admin if configured, starts the daily birthday check and
//! serves the JSON API under `/api`.
//!
//! # Password hash generation
//!
//! ```
//! cargo run -p cumple-server --bin server -- --hash-password
//! ```

mod config;
mod notifier;
mod scheduler;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use cumple_api::auth::{default_password, hash_password};
use cumple_core::{
  clock::{Clock, SystemClock},
  person::NewPerson,
  store::BirthdayStore,
};
use cumple_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  config::{AdminSeed, ServerConfig},
  notifier::LogNotifier,
};

#[derive(Parser)]
#[command(author, version, about = "cumple birthday server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    println!("{}", hash_password(&password).context("failed to hash password")?);
    return Ok(());
  }

  let server_cfg = ServerConfig::load(cli.config)?;
  let notify_at = server_cfg.notify_at()?;

  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  if let Some(seed) = &server_cfg.admin {
    seed_admin(&store, seed).await?;
  }

  let clock: Arc<dyn Clock> = Arc::new(SystemClock);

  tokio::spawn(scheduler::run(
    store.clone(),
    clock.clone(),
    Arc::new(LogNotifier),
    notify_at,
  ));
  tracing::info!(at = %notify_at, "daily birthday check enabled");

  let app = Router::new()
    .nest("/api", cumple_api::api_router(store, clock))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create the configured admin unless one already exists.
async fn seed_admin(store: &SqliteStore, seed: &AdminSeed) -> anyhow::Result<()> {
  if store.count_admins().await? > 0 {
    tracing::debug!("admin already present, skipping seed");
    return Ok(());
  }

  let mut input = NewPerson::new(&seed.name, &seed.email, seed.birth_date).normalized();
  input.is_admin = true;
  input.validate().context("invalid [admin] configuration")?;

  let password = seed
    .password
    .clone()
    .unwrap_or_else(|| default_password(seed.birth_date));
  let hash = hash_password(&password).context("failed to hash admin password")?;

  let admin = store.create(input, Some(hash)).await?;
  tracing::info!(id = %admin.id, name = %admin.name, "admin created");
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  prompt_password(std::io::stdin().lock(), std::io::stdout())
}

fn prompt_password(
  mut input: impl std::io::BufRead,
  mut output: impl std::io::Write,
) -> anyhow::Result<String> {
  write!(output, "Password: ").context("failed to write prompt")?;
  output.flush().context("failed to flush prompt")?;
  let mut line = String::new();
  input.read_line(&mut line).context("failed to read password")?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
