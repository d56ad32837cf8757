//! Error taxonomy shared by the engine crates.

use thiserror::Error;

use crate::store::ContactId;

/// Address-book store failure.
///
/// Callers recover failed *reads* into "no data". Lookup and write failures
/// must propagate: a partial write reported as success, or a failed lookup
/// reported as "no match", would mislead the user.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("address book unavailable: {0}")]
  Unavailable(String),

  #[error("address book write failed: {0}")]
  WriteFailed(String),

  #[error("contact {0} not found")]
  NotFound(ContactId),

  #[error("contact {0} could not be read back after write")]
  MissingAfterWrite(ContactId),
}

/// Attachment byte-stream failure. Swallowed per-attachment by the wire
/// mapper — the surrounding contact is still transmitted without the image.
#[derive(Debug, Error)]
pub enum StreamError {
  #[error("failed to open attachment stream: {0}")]
  Open(#[source] std::io::Error),

  #[error("failed to read attachment bytes: {0}")]
  Read(#[source] std::io::Error),

  #[error("failed to persist attachment: {0}")]
  Persist(#[source] std::io::Error),
}

/// Registration-directory failure. Callers default a failed refresh to
/// "not registered".
#[derive(Debug, Error)]
pub enum DirectoryError {
  #[error("directory refresh failed: {0}")]
  Refresh(String),
}
