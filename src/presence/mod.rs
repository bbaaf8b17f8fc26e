// Room membership tracking
//
// The registry is plain in-memory state with no locking of its own; the
// relay owns it and serializes every access.

// Public API
pub use models::{ConnectionId, Roster};
pub use registry::{PresenceError, RoomRegistry};

// Internal modules
mod models;
mod registry;
