//! Outbound wire representation of shared contacts.
//!
//! When an outgoing message carries one or more contact cards, each card is
//! mapped onto the structures here before transmission. The mapping is 1:1
//! except for the type enums, which are remapped from the model taxonomy to
//! the independent wire taxonomy, and the avatar, whose bytes are opened and
//! wrapped with length/content-type metadata at mapping time.

mod contact;
mod map;

pub use contact::{
  AddressType, AttachmentPayload, Avatar, Email, EmailType, Name, Phone,
  PhoneType, PostalAddress, SharedContact,
};
pub use map::shared_contacts_for;
