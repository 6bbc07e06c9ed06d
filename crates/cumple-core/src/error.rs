//! Error types for `cumple-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("invalid date: {0}")]
  InvalidDate(String),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  #[error("a custom greeting needs a non-empty prompt")]
  EmptyPrompt,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
