//! Error taxonomy for the data layer.
//!
//! Lower layers raise their own error type; the repository lifts them into
//! [`Error`] unchanged and the list store is the only place that turns one
//! into a user-facing message.

use thiserror::Error;

/// Message shown when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Local persistence failure.
#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Failed to open dog cache at {path}: {source}")]
  Open {
    path: String,
    #[source]
    source: rusqlite::Error,
  },

  #[error("Database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("Failed to create cache directory: {0}")]
  Io(#[from] std::io::Error),

  #[error("Cache lock poisoned")]
  LockPoisoned,

  #[error("Cache task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

/// Remote fetch failure, covering transport, HTTP status and decoding.
#[derive(Error, Debug)]
pub enum NetworkError {
  #[error("Network error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Server returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("Invalid response: {0}")]
  Decode(#[from] serde_json::Error),
}

impl NetworkError {
  pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
    NetworkError::Status {
      status: status.as_u16(),
      body: truncate_body(body),
    }
  }
}

fn truncate_body(body: &str) -> String {
  if body.len() <= MAX_ERROR_BODY_LENGTH {
    return body.to_string();
  }
  let mut end = MAX_ERROR_BODY_LENGTH;
  while !body.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

/// Any failure surfaced by the dog data path.
#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Network(#[from] NetworkError),

  #[error("{}", .0.as_deref().unwrap_or(UNKNOWN_ERROR))]
  Unknown(Option<String>),
}

impl Error {
  /// The failure's own message, if it has one.
  pub fn message(&self) -> Option<String> {
    match self {
      Error::Unknown(message) => message.clone(),
      other => Some(other.to_string()),
    }
  }

  /// Message for display, falling back to [`UNKNOWN_ERROR`].
  pub fn user_message(&self) -> String {
    self
      .message()
      .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
  }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unknown_without_message_falls_back() {
    let err = Error::Unknown(None);
    assert_eq!(err.message(), None);
    assert_eq!(err.user_message(), UNKNOWN_ERROR);
    assert_eq!(err.to_string(), UNKNOWN_ERROR);
  }

  #[test]
  fn test_unknown_with_message_is_kept() {
    let err = Error::Unknown(Some("boom".to_string()));
    assert_eq!(err.user_message(), "boom");
  }

  #[test]
  fn test_network_error_is_transparent() {
    let err: Error = NetworkError::Status {
      status: 503,
      body: "down".to_string(),
    }
    .into();
    assert_eq!(err.user_message(), "Server returned 503: down");
  }

  #[test]
  fn test_from_status_truncates_long_body() {
    let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
    match NetworkError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body) {
      NetworkError::Status { status, body } => {
        assert_eq!(status, 502);
        assert!(body.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(body.ends_with("(truncated, 520 total bytes)"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }
}
