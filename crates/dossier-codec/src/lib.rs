//! JSON codec for the contact model.
//!
//! One text form serves two purposes: persistence inside message
//! attachments, and handing a contact across a process boundary. Image
//! bytes never appear in the text — the document records only the avatar's
//! profile flag, and [`decode`] reattaches an externally supplied image
//! reference.
//!
//! Pure and synchronous; no I/O.
//!
//! # Quick start
//!
//! ```no_run
//! use dossier_core::contact::{Contact, Name};
//!
//! let contact = Contact::new(Name::default(), None, vec![], vec![], vec![], None);
//! let text = dossier_codec::encode(&contact).unwrap();
//! let back = dossier_codec::decode(&text, None).unwrap();
//! assert_eq!(back, contact);
//! ```

mod document;
pub mod error;

use dossier_core::{attachment::AttachmentRef, contact::Contact};

use crate::document::ContactDoc;
pub use crate::error::{Error, Result};

/// Encode `contact` as the persisted JSON text form.
pub fn encode(contact: &Contact) -> Result<String> {
  Ok(serde_json::to_string(&ContactDoc::from_contact(contact))?)
}

/// Decode a contact from its JSON text form.
///
/// `image` is the out-of-band reference to the avatar bytes, when the caller
/// has one. An avatar is reconstructed only when the document carries an
/// `avatar` key *and* `image` is supplied; an absent key is valid and yields
/// no avatar even if a reference was passed.
///
/// Decode is strict: malformed JSON, a missing required field, or an
/// unrecognized type name is an [`Error`], never a silent default.
pub fn decode(input: &str, image: Option<AttachmentRef>) -> Result<Contact> {
  let doc: ContactDoc = serde_json::from_str(input)?;
  Ok(doc.into_contact(image))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
