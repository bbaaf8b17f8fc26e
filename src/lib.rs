// Library crate for the LiveBoard relay
// This file exposes the public API for integration tests

pub mod config;
pub mod presence;
pub mod relay;
pub mod routes;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::ServerConfig;
pub use presence::{ConnectionId, PresenceError, RoomRegistry, Roster};
pub use relay::{EventRelay, RelayError};
pub use shared::AppState;
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};
