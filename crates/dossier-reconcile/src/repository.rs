//! The repository façade: reconciliation sequenced over the capability
//! interfaces.
//!
//! Every method is an `async fn` meant to be driven from the caller's
//! background worker — the engine never spawns. Within a single call,
//! applying a diff happens-before the re-read of the same contact. Failed
//! reads degrade to "no data"; failed lookups and writes propagate.

use std::io::Read as _;

use bytes::Bytes;
use dossier_core::{
  attachment::{AttachmentRef, AttachmentStore},
  contact::{Avatar, Contact},
  directory::{RegisteredState, RegistrationDirectory},
  error::{StoreError, StreamError},
  info::ContactInfo,
  store::{AddressBookStore, ContactId, FieldInsert, InsertTarget},
};
use tracing::warn;

use crate::{
  diff::{ContactDiff, diff, is_superset},
  lookup::lookup_keys,
  normalize::Region,
};

// ─── Share state ─────────────────────────────────────────────────────────────

/// User-facing state of a share-reconciliation flow. `Loading` from the
/// moment an incoming contact is accepted until the candidate lookup
/// completes; then `Added` iff a matching local contact already fully
/// contains the card, else `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareState {
  Loading,
  New,
  Added,
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// Reconciliation operations backed by the platform address book, the
/// registration directory, and attachment storage.
pub struct ContactRepository<S, D, A> {
  address_book: S,
  directory:    D,
  attachments:  A,
  region:       Option<Region>,
}

impl<S, D, A> ContactRepository<S, D, A>
where
  S: AddressBookStore,
  D: RegistrationDirectory,
  A: AttachmentStore,
{
  pub fn new(
    address_book: S,
    directory: D,
    attachments: A,
    region: Option<Region>,
  ) -> Self {
    Self {
      address_book,
      directory,
      attachments,
      region,
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Read a full contact from the address book.
  ///
  /// Individual field reads that fail degrade to "no data". A row with
  /// neither a usable name nor an organization yields `None` — there is
  /// nothing to label the card with.
  pub async fn read_contact(&self, id: ContactId) -> Option<Contact> {
    let name =
      recover(self.address_book.read_name(id).await, "name").unwrap_or_default();
    let organization =
      recover(self.address_book.read_organization(id).await, "organization")
        .filter(|o| !o.is_empty());

    if name.is_empty() && organization.is_none() {
      return None;
    }

    let phone_numbers = recover(self.address_book.read_phones(id).await, "phones");
    let emails = recover(self.address_book.read_emails(id).await, "emails");
    let postal_addresses = recover(
      self.address_book.read_postal_addresses(id).await,
      "postal addresses",
    );
    let avatar = recover(self.address_book.read_avatar(id).await, "avatar")
      .map(|image| Avatar {
        image,
        is_profile: false,
      });

    Some(Contact::new(
      name,
      organization,
      phone_numbers,
      emails,
      postal_addresses,
      avatar,
    ))
  }

  /// Read several contacts; unreadable entries are skipped.
  pub async fn contacts(&self, ids: &[ContactId]) -> Vec<Contact> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
      if let Some(contact) = self.read_contact(*id).await {
        out.push(contact);
      }
    }
    out
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Save `contact` as a brand-new address-book entry and return it as
  /// re-read from the store, with registration info attached.
  ///
  /// Profile avatars are never written to the address book. Avatar bytes
  /// that cannot be read are skipped with a warning; everything else is
  /// still inserted.
  pub async fn save_as_new_contact(
    &self,
    contact: &Contact,
  ) -> Result<ContactInfo, StoreError> {
    let mut ops: Vec<FieldInsert> =
      vec![FieldInsert::Name(contact.name().clone())];

    if let Some(org) = contact.organization().filter(|o| !o.is_empty()) {
      ops.push(FieldInsert::Organization(org.to_string()));
    }
    for phone in contact.phone_numbers() {
      ops.push(FieldInsert::Phone(phone.clone()));
    }
    for email in contact.emails() {
      ops.push(FieldInsert::Email(email.clone()));
    }
    for address in contact.postal_addresses() {
      ops.push(FieldInsert::PostalAddress(address.clone()));
    }
    if let Some(avatar) = contact.avatar().filter(|a| !a.is_profile) {
      if let Some(bytes) = self.avatar_bytes(&avatar.image) {
        ops.push(FieldInsert::Photo(bytes));
      }
    }

    let id = self
      .address_book
      .insert_fields(InsertTarget::New, ops)
      .await?;

    match self.read_contact(id).await {
      Some(saved) => Ok(self.contact_info(saved).await),
      None => Err(StoreError::MissingAfterWrite(id)),
    }
  }

  /// Merge the new fields of `incoming` into the existing contact `id`:
  /// diff, apply the additions as one batch, then re-read.
  pub async fn save_details_to_existing_contact(
    &self,
    id: ContactId,
    incoming: &Contact,
  ) -> Result<ContactInfo, StoreError> {
    let existing = self
      .read_contact(id)
      .await
      .ok_or(StoreError::NotFound(id))?;

    let changes = diff(&existing, incoming);
    let ops = self.insert_ops(&changes);
    if !ops.is_empty() {
      self
        .address_book
        .insert_fields(InsertTarget::Existing(id), ops)
        .await?;
    }

    match self.read_contact(id).await {
      Some(updated) => Ok(self.contact_info(updated).await),
      None => Err(StoreError::MissingAfterWrite(id)),
    }
  }

  fn insert_ops(&self, changes: &ContactDiff) -> Vec<FieldInsert> {
    let mut ops = Vec::new();
    for phone in changes.phone_numbers() {
      ops.push(FieldInsert::Phone(phone.clone()));
    }
    for email in changes.emails() {
      ops.push(FieldInsert::Email(email.clone()));
    }
    for address in changes.postal_addresses() {
      ops.push(FieldInsert::PostalAddress(address.clone()));
    }
    if let Some(org) = changes.organization() {
      ops.push(FieldInsert::Organization(org.to_string()));
    }
    if let Some(avatar) = changes.avatar() {
      if let Some(bytes) = self.avatar_bytes(&avatar.image) {
        ops.push(FieldInsert::Photo(bytes));
      }
    }
    ops
  }

  // ── Matching ──────────────────────────────────────────────────────────────

  /// Find the id of the candidate local contact for `incoming`, trying each
  /// lookup key in order: the first phone number as provided, its
  /// local-dialing form, then the first email. The first positive match
  /// short-circuits; `Ok(None)` means the card is wholly new.
  ///
  /// A store failure is surfaced as `Err` — a failed lookup is a distinct
  /// outcome, never folded into "no match".
  pub async fn find_candidate(
    &self,
    incoming: &Contact,
  ) -> Result<Option<ContactId>, StoreError> {
    for key in lookup_keys(incoming, self.region) {
      if let Some(id) = self.address_book.find_contact_id(key).await? {
        return Ok(Some(id));
      }
    }
    Ok(None)
  }

  /// Find a local contact that already fully contains `incoming`.
  ///
  /// Returns `Ok(None)` when nothing matches, or when the match still lacks
  /// some of the incoming fields and should be offered as a merge instead.
  pub async fn matching_existing_contact(
    &self,
    incoming: &Contact,
  ) -> Result<Option<ContactInfo>, StoreError> {
    let Some(id) = self.find_candidate(incoming).await? else {
      return Ok(None);
    };
    let Some(existing) = self.read_contact(id).await else {
      return Ok(None);
    };

    if is_superset(&existing, incoming) {
      Ok(Some(self.contact_info(existing).await))
    } else {
      Ok(None)
    }
  }

  /// Resolve the post-lookup share state for `incoming`: the matched local
  /// contact with [`ShareState::Added`] when a superset match exists,
  /// otherwise the incoming contact itself with [`ShareState::New`].
  pub async fn resolve_share(
    &self,
    incoming: &Contact,
  ) -> Result<(ShareState, ContactInfo), StoreError> {
    match self.matching_existing_contact(incoming).await? {
      Some(info) => Ok((ShareState::Added, info)),
      None => Ok((ShareState::New, ContactInfo::new(incoming.clone()))),
    }
  }

  // ── Avatars ───────────────────────────────────────────────────────────────

  /// Re-home each contact's avatar bytes into the attachment store and
  /// rebuild the contact around the persisted reference. A failed persist
  /// drops that avatar; the contact itself survives.
  pub async fn persist_contact_images(
    &self,
    contacts: Vec<Contact>,
  ) -> Vec<Contact> {
    contacts
      .into_iter()
      .map(|contact| {
        let avatar = contact.avatar().and_then(|a| self.persist_avatar(a));
        contact.with_avatar(avatar)
      })
      .collect()
  }

  fn persist_avatar(&self, avatar: &Avatar) -> Option<Avatar> {
    let persist = || -> Result<AttachmentRef, StreamError> {
      let mut stream = self.attachments.open_stream(&avatar.image)?;
      self
        .attachments
        .persist(&mut *stream.reader, &stream.content_type)
    };

    match persist() {
      Ok(image) => Some(Avatar {
        image,
        is_profile: avatar.is_profile,
      }),
      Err(e) => {
        warn!(image = %avatar.image, error = %e, "failed to persist avatar; dropping it");
        None
      }
    }
  }

  /// Read the avatar image fully. Failures yield `None` with a warning; the
  /// surrounding write proceeds without a photo.
  fn avatar_bytes(&self, image: &AttachmentRef) -> Option<Bytes> {
    let read = || -> Result<Bytes, StreamError> {
      let mut stream = self.attachments.open_stream(image)?;
      let mut buf = Vec::with_capacity(stream.length as usize);
      stream.reader.read_to_end(&mut buf).map_err(StreamError::Read)?;
      Ok(Bytes::from(buf))
    };

    match read() {
      Ok(bytes) => Some(bytes),
      Err(e) => {
        warn!(image = %image, error = %e, "failed to read avatar bytes; writing contact without photo");
        None
      }
    }
  }

  // ── Registration info ─────────────────────────────────────────────────────

  /// Attach registration ("push") state for every number of `contact`. An
  /// unknown cached state triggers a directory refresh; a failed refresh
  /// defaults to not-registered.
  pub async fn contact_info(&self, contact: Contact) -> ContactInfo {
    let mut info = ContactInfo::new(contact);

    for phone in info.contact().phone_numbers().to_vec() {
      let state = match self.directory.registered_state(&phone.number).await {
        RegisteredState::Unknown => {
          match self.directory.refresh(&phone.number).await {
            Ok(state) => state,
            Err(e) => {
              warn!(
                number = %phone.number,
                error = %e,
                "directory refresh failed; defaulting to not registered"
              );
              RegisteredState::NotRegistered
            }
          }
        }
        known => known,
      };
      info.set_push(&phone, state == RegisteredState::Registered);
    }

    info
  }
}

fn recover<T: Default>(result: Result<T, StoreError>, field: &str) -> T {
  match result {
    Ok(value) => value,
    Err(e) => {
      warn!(field, error = %e, "address book read failed; treating as no data");
      T::default()
    }
  }
}
