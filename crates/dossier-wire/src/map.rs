//! Contact model → wire mapping.

use dossier_core::{
  attachment::{AttachmentStore, AttachmentStream},
  contact as model,
};
use tracing::warn;

use crate::contact::{
  AddressType, AttachmentPayload, Avatar, Email, EmailType, Name, Phone,
  PhoneType, PostalAddress, SharedContact,
};

/// Map the contacts attached to an outgoing message into their wire form.
///
/// Returns `None` when the message carries no contacts at all, so the field
/// can be omitted from the outbound message entirely — which is distinct
/// from sending an empty list.
pub fn shared_contacts_for<A: AttachmentStore>(
  contacts: &[model::Contact],
  attachments: &A,
) -> Option<Vec<SharedContact>> {
  if contacts.is_empty() {
    return None;
  }

  Some(
    contacts
      .iter()
      .map(|c| wire_contact(c, attachments))
      .collect(),
  )
}

fn wire_contact<A: AttachmentStore>(
  contact: &model::Contact,
  attachments: &A,
) -> SharedContact {
  SharedContact {
    name:             wire_name(contact.name()),
    organization:     contact.organization().map(str::to_string),
    phone_numbers:    contact.phone_numbers().iter().map(wire_phone).collect(),
    emails:           contact.emails().iter().map(wire_email).collect(),
    postal_addresses: contact
      .postal_addresses()
      .iter()
      .map(wire_postal_address)
      .collect(),
    avatar:           contact.avatar().and_then(|a| wire_avatar(a, attachments)),
  }
}

/// Open the avatar bytes and wrap them with transmission metadata.
///
/// A stream that cannot be opened drops this avatar only — the rest of the
/// contact is still transmitted.
fn wire_avatar<A: AttachmentStore>(
  avatar: &model::Avatar,
  attachments: &A,
) -> Option<Avatar> {
  match attachments.open_stream(&avatar.image) {
    Ok(AttachmentStream {
      content_type,
      length,
      reader,
    }) => Some(Avatar {
      attachment: AttachmentPayload {
        content_type,
        length,
        stream: reader,
      },
      is_profile: avatar.is_profile,
    }),
    Err(e) => {
      warn!(image = %avatar.image, error = %e, "dropping unreadable avatar attachment");
      None
    }
  }
}

// ─── Field mapping ───────────────────────────────────────────────────────────

fn wire_name(name: &model::Name) -> Name {
  Name {
    display: name.display_name.clone(),
    given:   name.given_name.clone(),
    family:  name.family_name.clone(),
    prefix:  name.prefix.clone(),
    suffix:  name.suffix.clone(),
    middle:  name.middle_name.clone(),
  }
}

fn wire_phone(phone: &model::Phone) -> Phone {
  Phone {
    value: phone.number.clone(),
    kind:  phone_type(phone.kind),
    label: phone.label.clone(),
  }
}

fn wire_email(email: &model::Email) -> Email {
  Email {
    value: email.address.clone(),
    kind:  email_type(email.kind),
    label: email.label.clone(),
  }
}

fn wire_postal_address(addr: &model::PostalAddress) -> PostalAddress {
  PostalAddress {
    kind:         address_type(addr.kind),
    label:        addr.label.clone(),
    street:       addr.street.clone(),
    po_box:       addr.po_box.clone(),
    neighborhood: addr.neighborhood.clone(),
    city:         addr.city.clone(),
    region:       addr.region.clone(),
    postal_code:  addr.postal_code.clone(),
    country:      addr.country.clone(),
  }
}

// `Custom` is the catch-all for anything outside the fixed category set; the
// mapping is intentionally lossy in that direction.

fn phone_type(kind: model::PhoneType) -> PhoneType {
  match kind {
    model::PhoneType::Home => PhoneType::Home,
    model::PhoneType::Mobile => PhoneType::Mobile,
    model::PhoneType::Work => PhoneType::Work,
    model::PhoneType::Custom => PhoneType::Custom,
  }
}

fn email_type(kind: model::EmailType) -> EmailType {
  match kind {
    model::EmailType::Home => EmailType::Home,
    model::EmailType::Mobile => EmailType::Mobile,
    model::EmailType::Work => EmailType::Work,
    model::EmailType::Custom => EmailType::Custom,
  }
}

fn address_type(kind: model::AddressType) -> AddressType {
  match kind {
    model::AddressType::Home => AddressType::Home,
    model::AddressType::Work => AddressType::Work,
    model::AddressType::Custom => AddressType::Custom,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
