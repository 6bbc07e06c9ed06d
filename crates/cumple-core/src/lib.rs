//! Core types and the birthday date engine for the cumple birthday tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod clock;
pub mod date;
pub mod engine;
pub mod error;
pub mod greeting;
pub mod person;
pub mod share;
pub mod store;

pub use date::CalendarDate;
pub use error::{Error, Result};
