use thiserror::Error;

use crate::presence::PresenceError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Sender is not a member of room {0}")]
    NotInRoom(String),

    #[error(transparent)]
    Presence(#[from] PresenceError),

    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    /// Whether the event was dropped because of the client's input rather
    /// than a server-side problem
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            RelayError::MalformedEvent(_) | RelayError::NotInRoom(_)
        )
    }
}
