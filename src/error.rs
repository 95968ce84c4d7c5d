//! Error taxonomy shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds surfaced by the market client, the saved-coins store, and
/// configuration loading. Every variant renders as a user-displayable
/// message; callers surface it rather than crash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Connectivity failure or a non-success HTTP status.
  #[error("network error: {0}")]
  Network(String),

  /// The remote payload could not be decoded.
  #[error("failed to decode response: {0}")]
  Decoding(String),

  /// The local saved-coins store failed.
  #[error("storage error: {0}")]
  Storage(String),

  /// Configuration could not be loaded or is invalid.
  #[error("configuration error: {0}")]
  Config(String),
}

impl From<rusqlite::Error> for Error {
  fn from(e: rusqlite::Error) -> Self {
    Error::Storage(e.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Error::Decoding(e.to_string())
  }
}
