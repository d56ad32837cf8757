//! The contact model — immutable value types describing a shared contact
//! card, independent of any platform address-book API.
//!
//! Construction validates nothing beyond the required name; lists default to
//! whatever the source produced, in source order. Identity for reconciliation
//! purposes is *not* structural equality: phones match by raw number, emails
//! by address, postal addresses by their canonical rendering. See
//! `dossier-reconcile`.

use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentRef;

fn is_blank(s: &Option<String>) -> bool {
  s.as_deref().is_none_or(str::is_empty)
}

// ─── Name ────────────────────────────────────────────────────────────────────

/// A structured personal name. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub given_name:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub family_name:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefix:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suffix:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub middle_name:  Option<String>,
}

impl Name {
  /// True iff every field is absent or the empty string. A contact whose
  /// name is empty is labelled by its organization instead.
  pub fn is_empty(&self) -> bool {
    is_blank(&self.display_name)
      && is_blank(&self.given_name)
      && is_blank(&self.family_name)
      && is_blank(&self.prefix)
      && is_blank(&self.suffix)
      && is_blank(&self.middle_name)
  }
}

// ─── Phone ───────────────────────────────────────────────────────────────────

/// Category for a phone number; mirrors the address-book taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneType {
  Home,
  Mobile,
  Work,
  Custom,
}

/// A telephone number. The number is stored exactly as sourced — raw, never
/// normalized at construction; normalization happens at matching time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone {
  pub number: String,
  #[serde(rename = "type")]
  pub kind:   PhoneType,
  /// Free-text category, meaningful only when `kind` is `Custom`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label:  Option<String>,
}

// ─── Email ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EmailType {
  Home,
  Mobile,
  Work,
  Custom,
}

/// An email address, matched case-sensitively as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email {
  #[serde(rename = "email")]
  pub address: String,
  #[serde(rename = "type")]
  pub kind:    EmailType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label:   Option<String>,
}

// ─── PostalAddress ───────────────────────────────────────────────────────────

/// Category for a postal address. There is no `Mobile` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressType {
  Home,
  Work,
  Custom,
}

/// A structured postal address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
  #[serde(rename = "type")]
  pub kind:         AddressType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub street:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub po_box:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub neighborhood: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub region:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub postal_code:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub country:      Option<String>,
}

impl PostalAddress {
  /// Canonical multi-line rendering: street, PO box, neighborhood,
  /// "city, region", postal code, country — empty parts omitted, joined with
  /// line breaks.
  ///
  /// Two addresses are the same address for reconciliation purposes iff
  /// their renderings match, regardless of how the structured fields are
  /// split between them.
  pub fn rendered(&self) -> String {
    fn part(s: &Option<String>) -> Option<&str> {
      s.as_deref().filter(|v| !v.is_empty())
    }

    let mut lines: Vec<String> = Vec::new();

    for piece in [&self.street, &self.po_box, &self.neighborhood] {
      if let Some(v) = part(piece) {
        lines.push(v.to_string());
      }
    }

    match (part(&self.city), part(&self.region)) {
      (Some(city), Some(region)) => lines.push(format!("{city}, {region}")),
      (Some(city), None) => lines.push(city.to_string()),
      (None, Some(region)) => lines.push(region.to_string()),
      (None, None) => {}
    }

    if let Some(v) = part(&self.postal_code) {
      lines.push(v.to_string());
    }
    if let Some(v) = part(&self.country) {
      lines.push(v.to_string());
    }

    lines.join("\n")
  }
}

// ─── Avatar ──────────────────────────────────────────────────────────────────

/// A reference to a contact's picture. `is_profile` marks avatars sourced
/// from the sender's account profile photo rather than an explicitly shared
/// image; profile avatars are never merged into the local address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
  pub image:      AttachmentRef,
  pub is_profile: bool,
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// An immutable contact card.
///
/// Lists keep their source order; the order carries no meaning. Instances
/// are never mutated, only superseded by newly constructed ones (e.g. via
/// [`Contact::with_avatar`] after the avatar bytes have been persisted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
  name:             Name,
  organization:     Option<String>,
  phone_numbers:    Vec<Phone>,
  emails:           Vec<Email>,
  postal_addresses: Vec<PostalAddress>,
  avatar:           Option<Avatar>,
}

impl Contact {
  pub fn new(
    name: Name,
    organization: Option<String>,
    phone_numbers: Vec<Phone>,
    emails: Vec<Email>,
    postal_addresses: Vec<PostalAddress>,
    avatar: Option<Avatar>,
  ) -> Self {
    Self {
      name,
      organization,
      phone_numbers,
      emails,
      postal_addresses,
      avatar,
    }
  }

  pub fn name(&self) -> &Name {
    &self.name
  }

  pub fn organization(&self) -> Option<&str> {
    self.organization.as_deref()
  }

  pub fn phone_numbers(&self) -> &[Phone] {
    &self.phone_numbers
  }

  pub fn emails(&self) -> &[Email] {
    &self.emails
  }

  pub fn postal_addresses(&self) -> &[PostalAddress] {
    &self.postal_addresses
  }

  pub fn avatar(&self) -> Option<&Avatar> {
    self.avatar.as_ref()
  }

  /// The label shown for this card: the display name when present, else the
  /// organization, else the empty string.
  pub fn display_name(&self) -> &str {
    match self.name.display_name.as_deref() {
      Some(n) if !n.is_empty() => n,
      _ => match self.organization.as_deref() {
        Some(o) if !o.is_empty() => o,
        _ => "",
      },
    }
  }

  /// A superseding copy of this contact with a different avatar.
  pub fn with_avatar(&self, avatar: Option<Avatar>) -> Contact {
    Contact {
      avatar,
      ..self.clone()
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
