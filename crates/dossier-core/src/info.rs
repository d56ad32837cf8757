//! [`ContactInfo`] — a contact bundled with per-number registration state.

use std::collections::HashMap;

use crate::contact::{Contact, Phone, PhoneType};

/// A contact plus a record of which of its numbers are registered messaging
/// users ("push"). Derived at read time, never persisted; numbers that were
/// never recorded default to not-push.
#[derive(Debug, Clone)]
pub struct ContactInfo {
  contact: Contact,
  push:    HashMap<Phone, bool>,
}

impl ContactInfo {
  pub fn new(contact: Contact) -> Self {
    Self {
      contact,
      push: HashMap::new(),
    }
  }

  pub fn contact(&self) -> &Contact {
    &self.contact
  }

  pub fn set_push(&mut self, number: &Phone, is_push: bool) {
    self.push.insert(number.clone(), is_push);
  }

  /// Whether `number` belongs to a registered messaging user. Absent
  /// entries are `false`.
  pub fn is_push(&self, number: &Phone) -> bool {
    self.push.get(number).copied().unwrap_or(false)
  }

  /// The number to lead with: the first registered number, else the first
  /// mobile number, else the first number in source order.
  pub fn display_number(&self) -> Option<&Phone> {
    let numbers = self.contact.phone_numbers();
    numbers
      .iter()
      .find(|p| self.is_push(p))
      .or_else(|| numbers.iter().find(|p| p.kind == PhoneType::Mobile))
      .or_else(|| numbers.first())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
