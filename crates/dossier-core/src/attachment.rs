//! Attachment byte storage — the capability interface behind avatar images.
//!
//! The engine never embeds image bytes in the contact model or its text
//! form; it passes [`AttachmentRef`]s around and opens the bytes only at the
//! moment they are needed (outbound wire mapping, photo inserts).

use std::{fmt, io::Read};

use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Opaque reference to stored image bytes — a URI or a storage handle,
/// whichever the implementation uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentRef(String);

impl AttachmentRef {
  pub fn new(reference: impl Into<String>) -> Self {
    Self(reference.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for AttachmentRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// An opened attachment: the byte stream plus the metadata needed to wrap it
/// for transmission. The reader is released when the value is dropped, on
/// every exit path.
pub struct AttachmentStream {
  pub content_type: String,
  pub length:       u64,
  pub reader:       Box<dyn Read + Send>,
}

impl fmt::Debug for AttachmentStream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AttachmentStream")
      .field("content_type", &self.content_type)
      .field("length", &self.length)
      .finish_non_exhaustive()
  }
}

/// Blob storage for attachment bytes.
///
/// Implementations may block; the repository façade runs them from its
/// worker context, never on the caller's thread.
pub trait AttachmentStore: Send + Sync {
  /// Open the bytes behind `reference` for reading.
  fn open_stream(
    &self,
    reference: &AttachmentRef,
  ) -> Result<AttachmentStream, StreamError>;

  /// Persist a byte stream and return a reference to the stored copy.
  fn persist(
    &self,
    data: &mut dyn Read,
    content_type: &str,
  ) -> Result<AttachmentRef, StreamError>;
}
