//! Wire types for a transmitted shared contact.
//!
//! These mirror the model's category names but have independent enum
//! identity — the wire taxonomy evolves with the message schema, not with
//! the local address book.

use std::{fmt, io::Read};

// ─── Type taxonomies ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneType {
  Home,
  Mobile,
  Work,
  Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailType {
  Home,
  Mobile,
  Work,
  Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
  Home,
  Work,
  Custom,
}

// ─── Field structures ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
  pub display: Option<String>,
  pub given:   Option<String>,
  pub family:  Option<String>,
  pub prefix:  Option<String>,
  pub suffix:  Option<String>,
  pub middle:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone {
  pub value: String,
  pub kind:  PhoneType,
  pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
  pub value: String,
  pub kind:  EmailType,
  pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
  pub kind:         AddressType,
  pub label:        Option<String>,
  pub street:       Option<String>,
  pub po_box:       Option<String>,
  pub neighborhood: Option<String>,
  pub city:         Option<String>,
  pub region:       Option<String>,
  pub postal_code:  Option<String>,
  pub country:      Option<String>,
}

// ─── Avatar ──────────────────────────────────────────────────────────────────

/// The opened avatar bytes wrapped with transmission metadata. The stream is
/// released on drop, on every exit path.
pub struct AttachmentPayload {
  pub content_type: String,
  pub length:       u64,
  pub stream:       Box<dyn Read + Send>,
}

impl fmt::Debug for AttachmentPayload {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AttachmentPayload")
      .field("content_type", &self.content_type)
      .field("length", &self.length)
      .finish_non_exhaustive()
  }
}

#[derive(Debug)]
pub struct Avatar {
  pub attachment: AttachmentPayload,
  pub is_profile: bool,
}

// ─── SharedContact ───────────────────────────────────────────────────────────

/// One contact card as transmitted inside an outgoing message.
#[derive(Debug)]
pub struct SharedContact {
  pub name:             Name,
  pub organization:     Option<String>,
  pub phone_numbers:    Vec<Phone>,
  pub emails:           Vec<Email>,
  pub postal_addresses: Vec<PostalAddress>,
  pub avatar:           Option<Avatar>,
}
