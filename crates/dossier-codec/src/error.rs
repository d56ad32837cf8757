//! Error type for the contact text-form codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed document: invalid JSON, a missing required field, or an
  /// unrecognized type name. Never recovered silently — a partially decoded
  /// contact would be misleading.
  #[error("malformed contact document: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
