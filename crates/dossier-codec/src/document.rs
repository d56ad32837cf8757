//! The JSON document envelope for the persisted text form.

use dossier_core::{
  attachment::AttachmentRef,
  contact::{Avatar, Contact, Email, Name, Phone, PostalAddress},
};
use serde::{Deserialize, Serialize};

/// Top-level document. Decode is strict: a document missing the name object
/// or any of the three list keys does not parse.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContactDoc {
  pub name:             Name,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub organization:     Option<String>,
  pub phone_numbers:    Vec<Phone>,
  pub emails:           Vec<Email>,
  pub postal_addresses: Vec<PostalAddress>,
  /// Present only when an avatar is attached, and carries only the profile
  /// flag — the image bytes travel out-of-band.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar:           Option<AvatarDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvatarDoc {
  pub is_profile: bool,
}

impl ContactDoc {
  pub fn from_contact(contact: &Contact) -> Self {
    Self {
      name:             contact.name().clone(),
      organization:     contact.organization().map(str::to_string),
      phone_numbers:    contact.phone_numbers().to_vec(),
      emails:           contact.emails().to_vec(),
      postal_addresses: contact.postal_addresses().to_vec(),
      avatar:           contact.avatar().map(|a| AvatarDoc {
        is_profile: a.is_profile,
      }),
    }
  }

  /// Rebuild the model value. The avatar is reattached only when the
  /// document recorded one *and* the caller supplied the image reference.
  pub fn into_contact(self, image: Option<AttachmentRef>) -> Contact {
    let avatar = match (self.avatar, image) {
      (Some(doc), Some(image)) => Some(Avatar {
        image,
        is_profile: doc.is_profile,
      }),
      _ => None,
    };

    Contact::new(
      self.name,
      self.organization,
      self.phone_numbers,
      self.emails,
      self.postal_addresses,
      avatar,
    )
  }
}
