//! Façade integration tests against in-memory collaborators.

use std::{
  collections::HashMap,
  io::{self, Cursor, Read},
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering},
  },
};

use bytes::Bytes;
use dossier_core::{
  attachment::{AttachmentRef, AttachmentStore, AttachmentStream},
  contact::{
    AddressType, Avatar, Contact, Email, EmailType, Name, Phone, PhoneType,
    PostalAddress,
  },
  directory::{RegisteredState, RegistrationDirectory},
  error::{DirectoryError, StoreError, StreamError},
  store::{AddressBookStore, ContactId, FieldInsert, InsertTarget, LookupKey},
};
use phonenumber::country;

use crate::{
  diff::is_superset,
  repository::{ContactRepository, ShareState},
};

// ─── In-memory address book ──────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Row {
  name:             Option<Name>,
  organization:     Option<String>,
  phones:           Vec<Phone>,
  emails:           Vec<Email>,
  postal_addresses: Vec<PostalAddress>,
  photo:            Option<Bytes>,
}

#[derive(Default)]
struct BookInner {
  rows:        Mutex<HashMap<i64, Row>>,
  next_id:     AtomicI64,
  fail_lookup: AtomicBool,
}

#[derive(Clone, Default)]
struct MemoryAddressBook {
  inner: Arc<BookInner>,
}

impl MemoryAddressBook {
  fn seed(&self, row: Row) -> ContactId {
    let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    self.inner.rows.lock().unwrap().insert(id, row);
    ContactId(id)
  }

  fn fail_lookups(&self) {
    self.inner.fail_lookup.store(true, Ordering::SeqCst);
  }

  fn row(&self, id: ContactId) -> Option<Row> {
    self.inner.rows.lock().unwrap().get(&id.0).cloned()
  }
}

impl AddressBookStore for MemoryAddressBook {
  async fn find_contact_id(
    &self,
    key: LookupKey,
  ) -> Result<Option<ContactId>, StoreError> {
    if self.inner.fail_lookup.load(Ordering::SeqCst) {
      return Err(StoreError::Unavailable("simulated outage".to_string()));
    }

    let rows = self.inner.rows.lock().unwrap();
    Ok(rows.iter().find_map(|(id, row)| {
      let hit = match &key {
        LookupKey::Phone(number) => {
          row.phones.iter().any(|p| &p.number == number)
        }
        LookupKey::Email(address) => {
          row.emails.iter().any(|e| &e.address == address)
        }
      };
      hit.then_some(ContactId(*id))
    }))
  }

  async fn read_name(&self, id: ContactId) -> Result<Option<Name>, StoreError> {
    Ok(self.row(id).and_then(|r| r.name))
  }

  async fn read_organization(
    &self,
    id: ContactId,
  ) -> Result<Option<String>, StoreError> {
    Ok(self.row(id).and_then(|r| r.organization))
  }

  async fn read_phones(&self, id: ContactId) -> Result<Vec<Phone>, StoreError> {
    Ok(self.row(id).map(|r| r.phones).unwrap_or_default())
  }

  async fn read_emails(&self, id: ContactId) -> Result<Vec<Email>, StoreError> {
    Ok(self.row(id).map(|r| r.emails).unwrap_or_default())
  }

  async fn read_postal_addresses(
    &self,
    id: ContactId,
  ) -> Result<Vec<PostalAddress>, StoreError> {
    Ok(self.row(id).map(|r| r.postal_addresses).unwrap_or_default())
  }

  async fn read_avatar(
    &self,
    id: ContactId,
  ) -> Result<Option<AttachmentRef>, StoreError> {
    Ok(
      self
        .row(id)
        .and_then(|r| r.photo.map(|_| AttachmentRef::new(format!("book://photo/{id}")))),
    )
  }

  async fn insert_fields(
    &self,
    target: InsertTarget,
    ops: Vec<FieldInsert>,
  ) -> Result<ContactId, StoreError> {
    let mut rows = self.inner.rows.lock().unwrap();

    let id = match target {
      InsertTarget::New => {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        rows.insert(id, Row::default());
        id
      }
      InsertTarget::Existing(ContactId(id)) => {
        if !rows.contains_key(&id) {
          return Err(StoreError::WriteFailed(format!("no contact {id}")));
        }
        id
      }
    };

    let row = rows.get_mut(&id).expect("row exists");
    for op in ops {
      match op {
        FieldInsert::Name(name) => row.name = Some(name),
        FieldInsert::Organization(org) => row.organization = Some(org),
        FieldInsert::Phone(phone) => row.phones.push(phone),
        FieldInsert::Email(email) => row.emails.push(email),
        FieldInsert::PostalAddress(address) => {
          row.postal_addresses.push(address)
        }
        FieldInsert::Photo(bytes) => row.photo = Some(bytes),
      }
    }

    Ok(ContactId(id))
  }
}

// ─── In-memory directory ─────────────────────────────────────────────────────

/// Numbers absent from `refreshed` fail their refresh round-trip.
#[derive(Clone, Default)]
struct MemoryDirectory {
  cached:    HashMap<String, RegisteredState>,
  refreshed: HashMap<String, RegisteredState>,
}

impl RegistrationDirectory for MemoryDirectory {
  async fn registered_state(&self, number: &str) -> RegisteredState {
    self
      .cached
      .get(number)
      .copied()
      .unwrap_or(RegisteredState::Unknown)
  }

  async fn refresh(
    &self,
    number: &str,
  ) -> Result<RegisteredState, DirectoryError> {
    self
      .refreshed
      .get(number)
      .copied()
      .ok_or_else(|| DirectoryError::Refresh(format!("no route to {number}")))
  }
}

// ─── In-memory attachment store ──────────────────────────────────────────────

#[derive(Default)]
struct AttachmentsInner {
  blobs: Mutex<HashMap<String, Bytes>>,
  next:  AtomicU64,
}

#[derive(Clone, Default)]
struct MemoryAttachments {
  inner: Arc<AttachmentsInner>,
}

impl MemoryAttachments {
  fn put(&self, key: &str, bytes: &[u8]) -> AttachmentRef {
    self
      .inner
      .blobs
      .lock()
      .unwrap()
      .insert(key.to_string(), Bytes::copy_from_slice(bytes));
    AttachmentRef::new(key)
  }

  fn get(&self, reference: &AttachmentRef) -> Option<Bytes> {
    self.inner.blobs.lock().unwrap().get(reference.as_str()).cloned()
  }
}

impl AttachmentStore for MemoryAttachments {
  fn open_stream(
    &self,
    reference: &AttachmentRef,
  ) -> Result<AttachmentStream, StreamError> {
    let bytes = self
      .get(reference)
      .ok_or_else(|| {
        StreamError::Open(io::Error::new(io::ErrorKind::NotFound, "no such blob"))
      })?;

    Ok(AttachmentStream {
      content_type: "image/jpeg".to_string(),
      length:       bytes.len() as u64,
      reader:       Box::new(Cursor::new(bytes.to_vec())),
    })
  }

  fn persist(
    &self,
    data: &mut dyn Read,
    _content_type: &str,
  ) -> Result<AttachmentRef, StreamError> {
    let mut buf = Vec::new();
    data.read_to_end(&mut buf).map_err(StreamError::Read)?;

    let key = format!(
      "persisted://{}",
      self.inner.next.fetch_add(1, Ordering::SeqCst)
    );
    self
      .inner
      .blobs
      .lock()
      .unwrap()
      .insert(key.clone(), Bytes::from(buf));
    Ok(AttachmentRef::new(key))
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

type Repo = ContactRepository<MemoryAddressBook, MemoryDirectory, MemoryAttachments>;

fn repo(
  book: &MemoryAddressBook,
  directory: MemoryDirectory,
  attachments: &MemoryAttachments,
) -> Repo {
  ContactRepository::new(
    book.clone(),
    directory,
    attachments.clone(),
    Some(country::US),
  )
}

fn name(display: &str) -> Name {
  Name {
    display_name: Some(display.to_string()),
    ..Name::default()
  }
}

fn phone(number: &str, kind: PhoneType) -> Phone {
  Phone {
    number: number.to_string(),
    kind,
    label: None,
  }
}

fn email(address: &str) -> Email {
  Email {
    address: address.to_string(),
    kind:    EmailType::Home,
    label:   None,
  }
}

fn home_address() -> PostalAddress {
  PostalAddress {
    kind:         AddressType::Home,
    label:        None,
    street:       Some("123 Main St".to_string()),
    po_box:       None,
    neighborhood: None,
    city:         Some("Springfield".to_string()),
    region:       Some("IL".to_string()),
    postal_code:  Some("62704".to_string()),
    country:      None,
  }
}

fn incoming(phones: Vec<Phone>, emails: Vec<Email>) -> Contact {
  Contact::new(name("Alice Smith"), None, phones, emails, vec![], None)
}

// ─── Saving new contacts ─────────────────────────────────────────────────────

#[tokio::test]
async fn save_as_new_contact_round_trips() {
  let book = MemoryAddressBook::default();
  let attachments = MemoryAttachments::default();
  let image = attachments.put("blob://avatar", &[1, 2, 3]);
  let repo = repo(&book, MemoryDirectory::default(), &attachments);

  let contact = Contact::new(
    name("Alice Smith"),
    Some("Acme Corp".to_string()),
    vec![phone("+12025550123", PhoneType::Mobile)],
    vec![email("alice@example.com")],
    vec![home_address()],
    Some(Avatar {
      image,
      is_profile: false,
    }),
  );

  let info = repo.save_as_new_contact(&contact).await.unwrap();
  let saved = info.contact();

  assert_eq!(saved.display_name(), "Alice Smith");
  assert_eq!(saved.organization(), Some("Acme Corp"));
  assert_eq!(saved.phone_numbers(), contact.phone_numbers());
  assert_eq!(saved.emails(), contact.emails());
  assert_eq!(saved.postal_addresses(), contact.postal_addresses());
  assert!(saved.avatar().is_some(), "photo row should be readable back");
}

#[tokio::test]
async fn profile_avatar_is_not_written() {
  let book = MemoryAddressBook::default();
  let attachments = MemoryAttachments::default();
  let image = attachments.put("blob://profile", &[9, 9]);
  let repo = repo(&book, MemoryDirectory::default(), &attachments);

  let contact = incoming(vec![phone("+12025550123", PhoneType::Mobile)], vec![])
    .with_avatar(Some(Avatar {
      image,
      is_profile: true,
    }));

  let info = repo.save_as_new_contact(&contact).await.unwrap();
  assert!(info.contact().avatar().is_none());
}

#[tokio::test]
async fn unreadable_avatar_bytes_do_not_block_the_save() {
  let book = MemoryAddressBook::default();
  let attachments = MemoryAttachments::default();
  let repo = repo(&book, MemoryDirectory::default(), &attachments);

  let contact = incoming(vec![phone("+12025550123", PhoneType::Mobile)], vec![])
    .with_avatar(Some(Avatar {
      image:      AttachmentRef::new("blob://gone"),
      is_profile: false,
    }));

  let info = repo.save_as_new_contact(&contact).await.unwrap();
  assert!(info.contact().avatar().is_none());
  assert_eq!(info.contact().phone_numbers().len(), 1);
}

// ─── Merging into existing contacts ──────────────────────────────────────────

#[tokio::test]
async fn merge_adds_only_missing_fields() {
  let book = MemoryAddressBook::default();
  let id = book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("+15550100", PhoneType::Home)],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let incoming = incoming(
    vec![
      phone("+15550100", PhoneType::Home),
      phone("+15550200", PhoneType::Mobile),
    ],
    vec![],
  );

  let info = repo
    .save_details_to_existing_contact(id, &incoming)
    .await
    .unwrap();

  let numbers: Vec<&str> = info
    .contact()
    .phone_numbers()
    .iter()
    .map(|p| p.number.as_str())
    .collect();
  assert_eq!(numbers, vec!["+15550100", "+15550200"]);

  // A second merge of the same card adds nothing further.
  let again = repo
    .save_details_to_existing_contact(id, &incoming)
    .await
    .unwrap();
  assert_eq!(again.contact().phone_numbers().len(), 2);
}

#[tokio::test]
async fn merge_result_is_a_superset_of_the_incoming_card() {
  let book = MemoryAddressBook::default();
  let id = book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("+15550100", PhoneType::Home)],
    emails: vec![email("old@example.com")],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let incoming = Contact::new(
    name("Alice Smith"),
    Some("Acme Corp".to_string()),
    vec![phone("+15550200", PhoneType::Mobile)],
    vec![email("alice@example.com")],
    vec![home_address()],
    None,
  );

  let info = repo
    .save_details_to_existing_contact(id, &incoming)
    .await
    .unwrap();

  assert!(is_superset(info.contact(), &incoming));
}

#[tokio::test]
async fn merge_never_overwrites_the_organization() {
  let book = MemoryAddressBook::default();
  let id = book.seed(Row {
    name: Some(name("Alice Smith")),
    organization: Some("Acme".to_string()),
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let card = Contact::new(
    name("Alice Smith"),
    Some("Widgets Inc".to_string()),
    vec![],
    vec![],
    vec![],
    None,
  );

  let info = repo.save_details_to_existing_contact(id, &card).await.unwrap();
  assert_eq!(info.contact().organization(), Some("Acme"));
}

#[tokio::test]
async fn merge_into_a_missing_contact_is_not_found() {
  let book = MemoryAddressBook::default();
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let result = repo
    .save_details_to_existing_contact(
      ContactId(404),
      &incoming(vec![], vec![]),
    )
    .await;
  assert!(matches!(result, Err(StoreError::NotFound(ContactId(404)))));
}

// ─── Candidate matching ──────────────────────────────────────────────────────

#[tokio::test]
async fn match_by_raw_number() {
  let book = MemoryAddressBook::default();
  book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("+12025550123", PhoneType::Mobile)],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let found = repo
    .matching_existing_contact(&incoming(
      vec![phone("+12025550123", PhoneType::Mobile)],
      vec![],
    ))
    .await
    .unwrap();
  assert!(found.is_some());
}

#[tokio::test]
async fn candidate_found_by_local_dialing_form() {
  let book = MemoryAddressBook::default();
  let id = book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("2025550123", PhoneType::Home)],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  // The raw key "+12025550123" misses; the local-dialing key "2025550123"
  // hits.
  let card = incoming(vec![phone("+12025550123", PhoneType::Mobile)], vec![]);
  assert_eq!(repo.find_candidate(&card).await.unwrap(), Some(id));

  // The stored contact does not carry the incoming number string itself, so
  // it is offered as a merge, not reported as already added.
  assert!(repo.matching_existing_contact(&card).await.unwrap().is_none());
}

#[tokio::test]
async fn match_by_email_when_the_card_has_no_numbers() {
  let book = MemoryAddressBook::default();
  book.seed(Row {
    name: Some(name("Alice Smith")),
    emails: vec![email("alice@example.com")],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let found = repo
    .matching_existing_contact(&incoming(vec![], vec![email("alice@example.com")]))
    .await
    .unwrap();
  assert!(found.is_some());
}

#[tokio::test]
async fn a_match_that_is_not_a_superset_is_rejected() {
  let book = MemoryAddressBook::default();
  book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("+15550100", PhoneType::Home)],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let found = repo
    .matching_existing_contact(&incoming(
      vec![
        phone("+15550100", PhoneType::Home),
        phone("+15550200", PhoneType::Mobile),
      ],
      vec![],
    ))
    .await
    .unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn no_candidate_is_ok_none() {
  let book = MemoryAddressBook::default();
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let found = repo
    .matching_existing_contact(&incoming(
      vec![phone("+15550100", PhoneType::Home)],
      vec![],
    ))
    .await
    .unwrap();
  assert!(found.is_none());
}

#[tokio::test]
async fn lookup_failure_is_surfaced_not_folded_into_no_match() {
  let book = MemoryAddressBook::default();
  book.fail_lookups();
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let result = repo
    .matching_existing_contact(&incoming(
      vec![phone("+15550100", PhoneType::Home)],
      vec![],
    ))
    .await;
  assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn resolve_share_reports_added_or_new() {
  let book = MemoryAddressBook::default();
  book.seed(Row {
    name: Some(name("Alice Smith")),
    phones: vec![phone("+15550100", PhoneType::Home)],
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  let known = incoming(vec![phone("+15550100", PhoneType::Home)], vec![]);
  let (state, _) = repo.resolve_share(&known).await.unwrap();
  assert_eq!(state, ShareState::Added);

  let unknown = incoming(vec![phone("+19995550000", PhoneType::Home)], vec![]);
  let (state, info) = repo.resolve_share(&unknown).await.unwrap();
  assert_eq!(state, ShareState::New);
  assert_eq!(info.contact(), &unknown);
}

// ─── Registration info ───────────────────────────────────────────────────────

#[tokio::test]
async fn contact_info_uses_cache_then_refresh_then_defaults() {
  let cached_number = phone("+12025550100", PhoneType::Mobile);
  let refreshed_number = phone("+12025550200", PhoneType::Mobile);
  let unreachable_number = phone("+12025550300", PhoneType::Mobile);

  let directory = MemoryDirectory {
    cached:    HashMap::from([(
      cached_number.number.clone(),
      RegisteredState::Registered,
    )]),
    refreshed: HashMap::from([(
      refreshed_number.number.clone(),
      RegisteredState::Registered,
    )]),
  };

  let book = MemoryAddressBook::default();
  let repo = repo(&book, directory, &MemoryAttachments::default());

  let contact = incoming(
    vec![
      cached_number.clone(),
      refreshed_number.clone(),
      unreachable_number.clone(),
    ],
    vec![],
  );

  let info = repo.contact_info(contact).await;
  assert!(info.is_push(&cached_number));
  assert!(info.is_push(&refreshed_number));
  assert!(!info.is_push(&unreachable_number));
}

// ─── Avatar persistence ──────────────────────────────────────────────────────

#[tokio::test]
async fn persist_contact_images_rehomes_the_bytes() {
  let attachments = MemoryAttachments::default();
  let original = attachments.put("blob://incoming", &[7, 7, 7]);
  let book = MemoryAddressBook::default();
  let repo = repo(&book, MemoryDirectory::default(), &attachments);

  let contact = incoming(vec![], vec![]).with_avatar(Some(Avatar {
    image:      original.clone(),
    is_profile: true,
  }));

  let persisted = repo.persist_contact_images(vec![contact]).await;
  let avatar = persisted[0].avatar().unwrap();

  assert_ne!(avatar.image, original);
  assert!(avatar.is_profile, "profile flag must survive persistence");
  assert_eq!(attachments.get(&avatar.image).unwrap().as_ref(), &[7, 7, 7]);
}

#[tokio::test]
async fn an_unpersistable_avatar_is_dropped_but_the_contact_survives() {
  let attachments = MemoryAttachments::default();
  let book = MemoryAddressBook::default();
  let repo = repo(&book, MemoryDirectory::default(), &attachments);

  let contact = incoming(vec![phone("+15550100", PhoneType::Home)], vec![])
    .with_avatar(Some(Avatar {
      image:      AttachmentRef::new("blob://gone"),
      is_profile: false,
    }));

  let persisted = repo.persist_contact_images(vec![contact]).await;
  assert!(persisted[0].avatar().is_none());
  assert_eq!(persisted[0].phone_numbers().len(), 1);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn a_row_with_neither_name_nor_organization_is_unreadable() {
  let book = MemoryAddressBook::default();
  let nameless = book.seed(Row {
    phones: vec![phone("+15550100", PhoneType::Home)],
    ..Row::default()
  });
  let org_only = book.seed(Row {
    organization: Some("Acme".to_string()),
    ..Row::default()
  });
  let repo = repo(&book, MemoryDirectory::default(), &MemoryAttachments::default());

  assert!(repo.read_contact(nameless).await.is_none());

  let contact = repo.read_contact(org_only).await.unwrap();
  assert_eq!(contact.display_name(), "Acme");

  // Bulk read skips the unreadable row.
  let all = repo.contacts(&[nameless, org_only]).await;
  assert_eq!(all.len(), 1);
}
