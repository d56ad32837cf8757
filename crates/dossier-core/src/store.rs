//! The address-book capability interface.
//!
//! Implemented by the platform integration layer. The engine consumes typed
//! read results and issues typed insert batches; it never parses raw rows.
//! All methods return `Send` futures so implementations can be driven from a
//! shared background worker pool.

use std::{fmt, future::Future};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
  attachment::AttachmentRef,
  contact::{Email, Name, Phone, PostalAddress},
  error::StoreError,
};

// ─── Identifiers and operations ──────────────────────────────────────────────

/// Opaque row id of a contact in the platform address book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Key used to look up a candidate local contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
  Phone(String),
  Email(String),
}

/// Where an insert batch lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTarget {
  /// Create a fresh contact and apply the batch to it.
  New,
  /// Append to an existing contact.
  Existing(ContactId),
}

/// One typed field-insert operation. Batches are strictly additive — the
/// engine never issues updates or deletes.
#[derive(Debug, Clone)]
pub enum FieldInsert {
  Name(Name),
  Organization(String),
  Phone(Phone),
  Email(Email),
  PostalAddress(PostalAddress),
  /// Raw image bytes for the contact photo row.
  Photo(Bytes),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the platform address book.
///
/// Failure contract: callers recover a failed *read* into "no data"; a
/// failed lookup or write propagates, because "no match" and "written" are
/// claims the engine must not fabricate.
pub trait AddressBookStore: Send + Sync {
  /// Find the contact that owns `key`. `Ok(None)` means no such contact.
  fn find_contact_id(
    &self,
    key: LookupKey,
  ) -> impl Future<Output = Result<Option<ContactId>, StoreError>> + Send + '_;

  fn read_name(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Name>, StoreError>> + Send + '_;

  fn read_organization(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send + '_;

  fn read_phones(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Vec<Phone>, StoreError>> + Send + '_;

  fn read_emails(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Vec<Email>, StoreError>> + Send + '_;

  fn read_postal_addresses(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Vec<PostalAddress>, StoreError>> + Send + '_;

  fn read_avatar(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<AttachmentRef>, StoreError>> + Send + '_;

  /// Apply `ops` as a single batch and return the id of the affected
  /// contact.
  fn insert_fields(
    &self,
    target: InsertTarget,
    ops: Vec<FieldInsert>,
  ) -> impl Future<Output = Result<ContactId, StoreError>> + Send + '_;
}
