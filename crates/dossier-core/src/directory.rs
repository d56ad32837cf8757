//! Registration directory — "does this number belong to a messaging user".

use std::future::Future;

use crate::error::DirectoryError;

/// Registration state of a phone number with the messaging service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisteredState {
  Registered,
  NotRegistered,
  Unknown,
}

/// Directory lookups for registration state.
pub trait RegistrationDirectory: Send + Sync {
  /// Cached registration state. Total — never a network round-trip.
  fn registered_state<'a>(
    &'a self,
    number: &'a str,
  ) -> impl Future<Output = RegisteredState> + Send + 'a;

  /// Refresh the state from the service (network round-trip). Callers
  /// default a failed refresh to [`RegisteredState::NotRegistered`].
  fn refresh<'a>(
    &'a self,
    number: &'a str,
  ) -> impl Future<Output = Result<RegisteredState, DirectoryError>> + Send + 'a;
}
