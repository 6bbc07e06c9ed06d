//! Router-level tests against an in-memory store and a fixed clock.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use cumple_core::{
  CalendarDate, clock::FixedClock, person::NewPerson, store::BirthdayStore,
};
use cumple_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

/// The clock used by every test: Sunday 10 March 2024.
fn clock() -> Arc<FixedClock> {
  Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()))
}

async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.unwrap())
}

async fn send(
  store:  &Arc<SqliteStore>,
  method: &str,
  uri:    &str,
  body:   Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(store.clone(), clock())
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn seed(store: &Arc<SqliteStore>, name: &str, birth: CalendarDate) -> uuid::Uuid {
  let input = NewPerson::new(name, format!("{}@example.com", name.to_lowercase()), birth);
  store.create(input, None).await.unwrap().id
}

fn names(bucket: &Value) -> Vec<&str> {
  bucket["birthdays"]
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["name"].as_str().unwrap())
    .collect()
}

// ─── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
  let s = store().await;
  let (status, body) = send(&s, "GET", "/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "OK");
}

// ─── CRUD ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_get_update_delete() {
  let s = store().await;

  let (status, created) = send(
    &s,
    "POST",
    "/birthdays",
    Some(json!({
      "name": "Alice",
      "email": "alice@example.com",
      "birthDate": "1990-03-15",
      "phone": "+34 600 111 222"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["birthDate"], "1990-03-15");
  assert_eq!(created["canEdit"], true);
  let id = created["id"].as_str().unwrap().to_owned();

  let (status, fetched) = send(&s, "GET", &format!("/birthdays/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["name"], "Alice");

  let (status, updated) = send(
    &s,
    "PUT",
    &format!("/birthdays/{id}"),
    Some(json!({
      "name": "Alicia",
      "email": "alicia@example.com",
      "birthDate": "1990-03-16"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Alicia");
  assert_eq!(updated["canEdit"], false);

  let (status, _) = send(&s, "DELETE", &format!("/birthdays/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(&s, "GET", &format!("/birthdays/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn create_rejects_missing_and_invalid_fields() {
  let s = store().await;

  let (status, body) = send(
    &s,
    "POST",
    "/birthdays",
    Some(json!({ "name": "Alice", "email": "alice@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("birthDate"));

  let (status, _) = send(
    &s,
    "POST",
    "/birthdays",
    Some(json!({ "name": "Bob", "email": "not-an-email", "birthDate": "1990-01-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &s,
    "POST",
    "/birthdays",
    Some(json!({ "name": "Carol", "email": "carol@example.com", "birthDate": "1990-02-30" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_is_not_found() {
  let s = store().await;
  let (status, _) = send(
    &s,
    "DELETE",
    &format!("/birthdays/{}", uuid::Uuid::new_v4()),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn second_admin_is_rejected() {
  let s = store().await;
  let admin = json!({
    "name": "Root",
    "email": "root@example.com",
    "birthDate": "1980-01-01",
    "isAdmin": true
  });
  let (status, _) = send(&s, "POST", "/birthdays", Some(admin)).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    &s,
    "POST",
    "/birthdays",
    Some(json!({
      "name": "Other",
      "email": "other@example.com",
      "birthDate": "1981-01-01",
      "isAdmin": true
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Admin already exists");
}

#[tokio::test]
async fn promoting_second_admin_is_a_bad_request() {
  let s = store().await;
  let mut root = NewPerson::new("Root", "root@example.com", CalendarDate::new(1980, 1, 1));
  root.is_admin = true;
  s.create(root, None).await.unwrap();
  let bob = seed(&s, "Bob", CalendarDate::new(1990, 1, 1)).await;

  let (status, body) = send(
    &s,
    "PUT",
    &format!("/birthdays/{bob}"),
    Some(json!({
      "name": "Bob",
      "email": "bob@example.com",
      "birthDate": "1990-01-01",
      "isAdmin": true
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Admin already exists");
  assert_eq!(s.count_admins().await.unwrap(), 1);
}

// ─── Buckets ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn today_and_upcoming_buckets() {
  let s = store().await;
  seed(&s, "Alice", CalendarDate::new(1990, 3, 10)).await;
  seed(&s, "Bob", CalendarDate::new(1985, 3, 12)).await;
  seed(&s, "Carol", CalendarDate::new(2000, 4, 1)).await;
  seed(&s, "Dave", CalendarDate::new(1970, 9, 1)).await;

  let (status, today) = send(&s, "GET", "/birthdays/today", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(today["referenceDate"], "2024-03-10");
  assert_eq!(names(&today), ["Alice"]);
  assert_eq!(today["birthdays"][0]["age"], 34);
  assert_eq!(today["birthdays"][0]["daysUntil"], 0);

  let (_, upcoming) = send(&s, "GET", "/birthdays/upcoming", None).await;
  assert_eq!(names(&upcoming), ["Bob", "Carol"]);
  assert_eq!(upcoming["birthdays"][0]["daysUntil"], 2);

  let (_, narrow) = send(&s, "GET", "/birthdays/upcoming?days=5", None).await;
  assert_eq!(names(&narrow), ["Bob"]);

  let (_, month) = send(&s, "GET", "/birthdays/this-month", None).await;
  // Input order, which the store sorts by birth date.
  assert_eq!(names(&month), ["Bob", "Alice"]);
}

#[tokio::test]
async fn today_override_moves_the_reference_date() {
  let s = store().await;
  seed(&s, "Leap", CalendarDate::new(2000, 2, 29)).await;

  let (_, body) = send(&s, "GET", "/birthdays/today?today=2023-02-28", None).await;
  assert_eq!(names(&body), ["Leap"]);
  assert_eq!(body["birthdays"][0]["daysUntil"], 0);
  assert_eq!(body["birthdays"][0]["age"], 22);
  assert_eq!(body["birthdays"][0]["turning"], 23);

  let (status, body) = send(&s, "GET", "/birthdays/today?today=2023-02-30", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("invalid date"));
}

#[tokio::test]
async fn calendar_orders_by_month_and_day() {
  let s = store().await;
  seed(&s, "Dec", CalendarDate::new(2001, 12, 5)).await;
  seed(&s, "Jan", CalendarDate::new(1960, 1, 20)).await;
  seed(&s, "Jun", CalendarDate::new(1990, 6, 1)).await;

  let (_, body) = send(&s, "GET", "/birthdays/calendar", None).await;
  assert_eq!(names(&body), ["Jan", "Jun", "Dec"]);
}

#[tokio::test]
async fn invalid_stored_record_is_reported_not_fatal() {
  let s = store().await;
  seed(&s, "Broken", CalendarDate::new(1990, 2, 30)).await;
  seed(&s, "Alice", CalendarDate::new(1990, 3, 10)).await;

  let (status, body) = send(&s, "GET", "/birthdays/today", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Alice"]);
  assert_eq!(body["skipped"][0]["name"], "Broken");
}

// ─── Analytics ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn analytics_summary() {
  let s = store().await;
  seed(&s, "Alice", CalendarDate::new(1990, 3, 10)).await;
  seed(&s, "Bob", CalendarDate::new(2010, 3, 20)).await;
  seed(&s, "Carol", CalendarDate::new(1950, 8, 1)).await;

  let (status, body) = send(&s, "GET", "/analytics", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 3);
  assert_eq!(body["thisMonth"], 2);
  assert_eq!(body["upcoming"], 2);
  assert_eq!(body["monthly"].as_array().unwrap().len(), 12);
}

// ─── Greetings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn greeting_with_share_links() {
  let s = store().await;
  let mut input = NewPerson::new("Alice", "alice@example.com", CalendarDate::new(1990, 3, 10));
  input.phone = Some("+34 600-111-222".into());
  let id = s.create(input, None).await.unwrap().id;

  let (status, body) = send(&s, "GET", &format!("/birthdays/{id}/greeting"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["message"].as_str().unwrap().contains("Alice"));
  assert!(body["links"]["whatsapp"].as_str().unwrap().starts_with("https://wa.me/+34600111222"));
  assert!(body["links"]["sms"].as_str().is_some());

  let (status, body) = send(
    &s,
    "GET",
    &format!("/birthdays/{id}/greeting?kind=custom&prompt=See%20you%20soon"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Personalized message for Alice: See you soon");

  let (status, _) = send(&s, "GET", &format!("/birthdays/{id}/greeting?kind=custom"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Auth ─────────────────────────────────────────────────────────────────────

async fn create_admin(s: &Arc<SqliteStore>) -> String {
  let (status, body) = send(
    s,
    "POST",
    "/birthdays",
    Some(json!({
      "name": "Root",
      "email": "root@example.com",
      "birthDate": "1980-07-04",
      "isAdmin": true
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn admin_logs_in_with_default_password() {
  let s = store().await;
  create_admin(&s).await;

  let (status, body) = send(
    &s,
    "POST",
    "/auth/login",
    Some(json!({ "email": "root@example.com", "password": "04/07/1980" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["user"]["name"], "Root");
  assert!(body["user"].get("passwordHash").is_none());

  let (status, _) = send(
    &s,
    "POST",
    "/auth/login",
    Some(json!({ "email": "Root", "password": "04/07/1980" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures() {
  let s = store().await;
  create_admin(&s).await;
  seed(&s, "Bob", CalendarDate::new(1990, 1, 1)).await;

  let (status, _) = send(&s, "POST", "/auth/login", Some(json!({ "email": "root@example.com" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &s,
    "POST",
    "/auth/login",
    Some(json!({ "email": "root@example.com", "password": "wrong" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    &s,
    "POST",
    "/auth/login",
    Some(json!({ "email": "bob@example.com", "password": "01/01/1990" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_flow() {
  let s = store().await;
  let id = create_admin(&s).await;

  let (status, _) = send(
    &s,
    "POST",
    "/auth/change-password",
    Some(json!({ "userId": id, "currentPassword": "nope", "newPassword": "fresh" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    &s,
    "POST",
    "/auth/change-password",
    Some(json!({ "userId": id, "currentPassword": "04/07/1980", "newPassword": "fresh" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    &s,
    "POST",
    "/auth/login",
    Some(json!({ "email": "root@example.com", "password": "fresh" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    &s,
    "POST",
    "/auth/change-password",
    Some(json!({
      "userId": uuid::Uuid::new_v4(),
      "currentPassword": "fresh",
      "newPassword": "x"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
