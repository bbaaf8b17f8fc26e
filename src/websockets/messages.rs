use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::presence::{ConnectionId, Roster};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // Client -> Server
    JoinRoom,
    LeaveRoom,
    Mutate,

    // Server -> Client
    Connected,
    RosterUpdated,
    MutationRelayed,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketMessageMeta {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub connection_id: Option<ConnectionId>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_key: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomPayload {
    pub room_key: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterUpdatedPayload {
    pub room_key: String,
    pub count: usize,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub connection_id: ConnectionId,
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
                connection_id: None,
            }),
        }
    }

    /// Create a CONNECTED message
    pub fn connected(connection_id: ConnectionId) -> Self {
        Self::new(
            MessageType::Connected,
            json!({ "connectionId": connection_id }),
        )
    }

    /// Create a ROSTER_UPDATED message
    pub fn roster_updated(room_key: &str, roster: &Roster) -> Self {
        Self::new(
            MessageType::RosterUpdated,
            json!({
                "roomKey": room_key,
                "count": roster.count,
                "names": roster.names,
            }),
        )
    }

    /// Create a MUTATION_RELAYED message, stamping the original sender
    pub fn mutation_relayed(sender: ConnectionId, payload: serde_json::Value) -> Self {
        let mut message = Self::new(MessageType::MutationRelayed, payload);
        if let Some(meta) = message.meta.as_mut() {
            meta.connection_id = Some(sender);
        }
        message
    }

    /// Create a JOIN_ROOM message
    pub fn join_room(room_key: &str, display_name: Option<&str>) -> Self {
        Self::new(
            MessageType::JoinRoom,
            json!({ "roomKey": room_key, "displayName": display_name }),
        )
    }

    /// Create a LEAVE_ROOM message
    pub fn leave_room(room_key: &str) -> Self {
        Self::new(MessageType::LeaveRoom, json!({ "roomKey": room_key }))
    }

    /// Create a MUTATE message
    pub fn mutate(room_key: &str, payload: serde_json::Value) -> Self {
        Self::new(
            MessageType::Mutate,
            json!({ "roomKey": room_key, "payload": payload }),
        )
    }
}
