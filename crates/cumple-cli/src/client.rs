//! Async HTTP client wrapping the cumple JSON API.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use cumple_core::{
  engine::{BirthdayEntry, SkippedRecord},
  person::{NewPerson, Person},
};
use reqwest::{Client, Response};
use serde::Deserialize;
use uuid::Uuid;

/// One dashboard bucket as returned by the `/birthdays/<bucket>` endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
  pub reference_date: NaiveDate,
  pub birthdays:      Vec<BirthdayEntry>,
  #[serde(default)]
  pub skipped:        Vec<SkippedRecord>,
}

#[derive(Debug, Deserialize)]
pub struct Greeting {
  pub message: String,
  /// Channel name to deep link; phone-based channels may be null.
  pub links:   BTreeMap<String, Option<String>>,
}

/// Greeting options forwarded as query parameters.
#[derive(Debug, Clone, Default)]
pub struct GreetingQuery {
  pub kind:    Option<String>,
  pub tone:    Option<String>,
  pub variant: Option<usize>,
  pub prompt:  Option<String>,
}

/// Async HTTP client for the cumple JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  fn date_query(today: Option<NaiveDate>) -> Vec<(&'static str, String)> {
    today.map(|d| ("today", d.to_string())).into_iter().collect()
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /api/birthdays`
  pub async fn list(&self) -> Result<Vec<Person>> {
    let resp = self
      .client
      .get(self.url("/birthdays"))
      .send()
      .await
      .context("GET /birthdays failed")?;
    ensure_success(resp, "GET /birthdays")
      .await?
      .json()
      .await
      .context("deserialising birthdays")
  }

  /// `POST /api/birthdays`
  pub async fn add(&self, input: &NewPerson) -> Result<Person> {
    let resp = self
      .client
      .post(self.url("/birthdays"))
      .json(input)
      .send()
      .await
      .context("POST /birthdays failed")?;
    ensure_success(resp, "POST /birthdays")
      .await?
      .json()
      .await
      .context("deserialising created birthday")
  }

  /// `DELETE /api/birthdays/{id}`
  pub async fn remove(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/birthdays/{id}")))
      .send()
      .await
      .context("DELETE /birthdays failed")?;
    ensure_success(resp, "DELETE /birthdays").await?;
    Ok(())
  }

  // ── Buckets ───────────────────────────────────────────────────────────────

  /// `GET /api/birthdays/today`
  pub async fn today(&self, today: Option<NaiveDate>) -> Result<Bucket> {
    let resp = self
      .client
      .get(self.url("/birthdays/today"))
      .query(&Self::date_query(today))
      .send()
      .await
      .context("GET /birthdays/today failed")?;
    ensure_success(resp, "GET /birthdays/today")
      .await?
      .json()
      .await
      .context("deserialising today's birthdays")
  }

  /// `GET /api/birthdays/upcoming?days=<n>`
  pub async fn upcoming(&self, days: u32, today: Option<NaiveDate>) -> Result<Bucket> {
    let mut query = Self::date_query(today);
    query.push(("days", days.to_string()));
    let resp = self
      .client
      .get(self.url("/birthdays/upcoming"))
      .query(&query)
      .send()
      .await
      .context("GET /birthdays/upcoming failed")?;
    ensure_success(resp, "GET /birthdays/upcoming")
      .await?
      .json()
      .await
      .context("deserialising upcoming birthdays")
  }

  // ── Greetings ─────────────────────────────────────────────────────────────

  /// `GET /api/birthdays/{id}/greeting`
  pub async fn greeting(&self, id: Uuid, q: &GreetingQuery) -> Result<Greeting> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(kind) = &q.kind {
      query.push(("kind", kind.clone()));
    }
    if let Some(tone) = &q.tone {
      query.push(("tone", tone.clone()));
    }
    if let Some(variant) = q.variant {
      query.push(("variant", variant.to_string()));
    }
    if let Some(prompt) = &q.prompt {
      query.push(("prompt", prompt.clone()));
    }

    let resp = self
      .client
      .get(self.url(&format!("/birthdays/{id}/greeting")))
      .query(&query)
      .send()
      .await
      .context("GET /birthdays/{id}/greeting failed")?;
    ensure_success(resp, "GET /birthdays/{id}/greeting")
      .await?
      .json()
      .await
      .context("deserialising greeting")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn ensure_success(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(anyhow!("{what} → {status}: {}", error_message(&body)))
}

/// The `error` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| body.trim().to_owned())
}
