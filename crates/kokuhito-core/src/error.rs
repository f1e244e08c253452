//! Error types for `kokuhito-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing; raised before any store call is made.
  #[error("required field missing: {0}")]
  Validation(&'static str),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  /// The backing store rejected or failed a call. The store's message
  /// passes through untouched so callers can surface it verbatim.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// True for errors recoverable locally without touching the store.
  pub fn is_validation(&self) -> bool { matches!(self, Self::Validation(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
