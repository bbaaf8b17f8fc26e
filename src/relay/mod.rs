// Event relay: validation, fan-out and presence notifications

// Public API
pub use errors::RelayError;
pub use event_relay::EventRelay;
pub use validation::{validate_mutation, MutationKind, ValidatedMutation};

// Internal modules
mod errors;
mod event_relay;
mod validation;
