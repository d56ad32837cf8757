//! The additive field-level diff between an incoming shared contact and an
//! existing local one.

use std::collections::HashSet;

use dossier_core::contact::{Avatar, Contact, Email, Phone, PostalAddress};

/// The fields present in an incoming contact but absent from the existing
/// one. Strictly additive: applying a diff never removes or overwrites
/// anything. Created fresh per reconciliation call and discarded after use.
#[derive(Debug, Clone, Default)]
pub struct ContactDiff {
  phone_numbers:    Vec<Phone>,
  emails:           Vec<Email>,
  postal_addresses: Vec<PostalAddress>,
  organization:     Option<String>,
  avatar:           Option<Avatar>,
}

impl ContactDiff {
  pub fn phone_numbers(&self) -> &[Phone] {
    &self.phone_numbers
  }

  pub fn emails(&self) -> &[Email] {
    &self.emails
  }

  pub fn postal_addresses(&self) -> &[PostalAddress] {
    &self.postal_addresses
  }

  pub fn organization(&self) -> Option<&str> {
    self.organization.as_deref()
  }

  pub fn avatar(&self) -> Option<&Avatar> {
    self.avatar.as_ref()
  }

  /// True iff the diff would change nothing at all.
  pub fn is_empty(&self) -> bool {
    self.phone_numbers.is_empty()
      && self.emails.is_empty()
      && self.postal_addresses.is_empty()
      && self.organization.is_none()
      && self.avatar.is_none()
  }
}

/// Compute the fields worth merging from `incoming` into `existing`.
///
/// Phones match by raw number string, emails by address, postal addresses by
/// their canonical rendering. The organization is taken only when the
/// existing contact has none; the avatar only when the existing contact has
/// none and the incoming one is not a profile photo.
pub fn diff(existing: &Contact, incoming: &Contact) -> ContactDiff {
  let known_numbers: HashSet<&str> = existing
    .phone_numbers()
    .iter()
    .map(|p| p.number.as_str())
    .collect();
  let phone_numbers = incoming
    .phone_numbers()
    .iter()
    .filter(|p| !known_numbers.contains(p.number.as_str()))
    .cloned()
    .collect();

  let known_addresses: HashSet<&str> = existing
    .emails()
    .iter()
    .map(|e| e.address.as_str())
    .collect();
  let emails = incoming
    .emails()
    .iter()
    .filter(|e| !known_addresses.contains(e.address.as_str()))
    .cloned()
    .collect();

  let known_postal: HashSet<String> = existing
    .postal_addresses()
    .iter()
    .map(PostalAddress::rendered)
    .collect();
  let postal_addresses = incoming
    .postal_addresses()
    .iter()
    .filter(|a| !known_postal.contains(&a.rendered()))
    .cloned()
    .collect();

  let organization = match existing.organization() {
    Some(o) if !o.is_empty() => None,
    _ => incoming
      .organization()
      .filter(|o| !o.is_empty())
      .map(str::to_string),
  };

  let avatar = match (existing.avatar(), incoming.avatar()) {
    (None, Some(a)) if !a.is_profile => Some(a.clone()),
    _ => None,
  };

  ContactDiff {
    phone_numbers,
    emails,
    postal_addresses,
    organization,
    avatar,
  }
}

/// True iff `existing` already contains every identity field of `incoming`:
/// every phone by number, every email by address, every postal address by
/// rendered text. Organization and avatar differences do not affect the
/// verdict.
pub fn is_superset(existing: &Contact, incoming: &Contact) -> bool {
  let d = diff(existing, incoming);
  d.phone_numbers.is_empty()
    && d.emails.is_empty()
    && d.postal_addresses.is_empty()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
