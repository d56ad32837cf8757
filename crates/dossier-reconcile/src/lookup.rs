//! Candidate-contact lookup keys.

use dossier_core::{contact::Contact, store::LookupKey};

use crate::normalize::{Region, local_number};

/// The keys used to find a candidate local contact, in query order: the
/// first phone number as provided, the same number in local-dialing form
/// (when that differs), then the first email address.
///
/// Callers query each key in turn and stop at the first positive match; an
/// incoming contact that matches none of them is wholly new.
pub fn lookup_keys(incoming: &Contact, region: Option<Region>) -> Vec<LookupKey> {
  let mut keys = Vec::new();

  if let Some(first) = incoming.phone_numbers().first() {
    keys.push(LookupKey::Phone(first.number.clone()));

    let local = local_number(&first.number, region);
    if local != first.number {
      keys.push(LookupKey::Phone(local));
    }
  }

  if let Some(first) = incoming.emails().first() {
    keys.push(LookupKey::Email(first.address.clone()));
  }

  keys
}

// ─── Tests ───────────────────────────────────────────────────────────────────
