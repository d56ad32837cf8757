//! Reconciliation engine for shared contact cards.
//!
//! Three pure pieces — phone normalization, the additive field-level
//! [`diff`], and the [`is_superset`] test — plus the [`ContactRepository`]
//! façade that sequences them against the platform capability interfaces:
//! candidate lookup, diff, apply, re-read.
//!
//! The pure functions are side-effect-free, perform no I/O, never block, and
//! share no mutable state; they are safe to call from any thread. The façade
//! methods are `async fn`s expected to run on a background worker supplied
//! by the caller — nothing here spawns.

pub mod diff;
pub mod lookup;
pub mod normalize;
pub mod repository;

#[cfg(test)]
mod tests;

pub use diff::{ContactDiff, diff, is_superset};
pub use lookup::lookup_keys;
pub use normalize::{Region, local_number, normalize, pretty_number};
pub use repository::{ContactRepository, ShareState};
