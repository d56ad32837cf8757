//! Core types and capability interfaces for the Dossier contact-share
//! engine.
//!
//! This crate is deliberately free of I/O and platform dependencies. The
//! model is a set of immutable value types; the address book, registration
//! directory, and attachment storage the engine talks to are capability
//! traits implemented elsewhere. All other crates depend on this one; it
//! depends on nothing proprietary.

pub mod attachment;
pub mod contact;
pub mod directory;
pub mod error;
pub mod info;
pub mod store;

pub use error::{DirectoryError, StoreError, StreamError};
