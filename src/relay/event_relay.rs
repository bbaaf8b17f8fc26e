use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::{
    presence::{ConnectionId, RoomRegistry, Roster},
    websockets::{
        messages::{JoinRoomPayload, LeaveRoomPayload, MessageType, WebSocketMessage},
        ConnectionManager,
    },
};

use super::errors::RelayError;
use super::validation::validate_mutation;

/// Bridges inbound connection events to registry mutations and outbound
/// broadcasts.
///
/// Every handler holds the registry lock from the membership change until its
/// broadcasts are queued, so all members of a room observe roster updates and
/// relayed mutations in the order the relay processed them.
pub struct EventRelay {
    registry: Mutex<RoomRegistry>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl EventRelay {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new()),
            connection_manager,
        }
    }

    /// Registers a freshly accepted connection and tells it its id
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
    ) -> Result<(), RelayError> {
        let mut registry = self.registry.lock().await;
        registry.register_connection(connection_id);
        self.connection_manager
            .add_connection(connection_id, sender)
            .await;

        let message_json = serde_json::to_string(&WebSocketMessage::connected(connection_id))?;
        self.connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;

        info!(connection_id = %connection_id, "Connection registered with relay");
        Ok(())
    }

    /// Routes one inbound message to the matching handler
    pub async fn handle_event(
        &self,
        connection_id: ConnectionId,
        message: WebSocketMessage,
    ) -> Result<(), RelayError> {
        match message.message_type {
            MessageType::JoinRoom => {
                let payload: JoinRoomPayload = parse_payload(message.payload)?;
                self.handle_join(connection_id, payload).await
            }
            MessageType::LeaveRoom => {
                let payload: LeaveRoomPayload = parse_payload(message.payload)?;
                self.handle_leave(connection_id, &payload.room_key).await
            }
            MessageType::Mutate => self.handle_mutation(connection_id, message.payload).await,
            other => Err(RelayError::MalformedEvent(format!(
                "{:?} is not accepted from clients",
                other
            ))),
        }
    }

    pub async fn handle_join(
        &self,
        connection_id: ConnectionId,
        payload: JoinRoomPayload,
    ) -> Result<(), RelayError> {
        if payload.room_key.is_empty() {
            return Err(RelayError::MalformedEvent("empty roomKey".to_string()));
        }
        let room_key = payload.room_key.as_str();

        let mut registry = self.registry.lock().await;
        registry.join(connection_id, room_key)?;

        if let Some(name) = payload.display_name.as_deref().filter(|n| !n.is_empty()) {
            registry.set_display_name(connection_id, room_key, name)?;
        }

        // Joiner is included so it learns the roster too
        let roster = registry.roster(room_key);
        let recipients = registry.members(room_key);
        self.send(&recipients, &WebSocketMessage::roster_updated(room_key, &roster))
            .await?;

        debug!(
            room_key = %room_key,
            connection_id = %connection_id,
            member_count = roster.count,
            "Roster broadcast after join"
        );
        Ok(())
    }

    pub async fn handle_leave(
        &self,
        connection_id: ConnectionId,
        room_key: &str,
    ) -> Result<(), RelayError> {
        let mut registry = self.registry.lock().await;

        let Some(roster) = registry.leave(connection_id, room_key) else {
            debug!(
                room_key = %room_key,
                connection_id = %connection_id,
                "Leave ignored, connection was not a member"
            );
            return Ok(());
        };

        let remaining = registry.members(room_key);
        self.send(&remaining, &WebSocketMessage::roster_updated(room_key, &roster))
            .await
    }

    /// Relays a validated mutation to every member of the room except the sender.
    ///
    /// Only members may publish into a room: a well-formed mutation from a
    /// connection that has not joined `roomKey` is rejected with
    /// [`RelayError::NotInRoom`] and reaches nobody.
    pub async fn handle_mutation(
        &self,
        connection_id: ConnectionId,
        event: Value,
    ) -> Result<(), RelayError> {
        let mutation = validate_mutation(&event)?;
        let room_key = mutation.room_key.as_str();

        let registry = self.registry.lock().await;
        if !registry.is_member(connection_id, room_key) {
            return Err(RelayError::NotInRoom(room_key.to_string()));
        }

        let recipients: Vec<ConnectionId> = registry
            .members(room_key)
            .into_iter()
            .filter(|member| *member != connection_id)
            .collect();

        debug!(
            room_key = %room_key,
            connection_id = %connection_id,
            kind = ?mutation.kind,
            recipients = recipients.len(),
            "Relaying mutation"
        );

        self.send(
            &recipients,
            &WebSocketMessage::mutation_relayed(connection_id, event),
        )
        .await
    }

    /// Removes the connection from every room and notifies the members left
    /// behind. Safe to call more than once.
    pub async fn handle_disconnect(&self, connection_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let affected = registry.drop_connection(connection_id);

        for (room_key, roster) in &affected {
            let remaining = registry.members(room_key);
            if let Err(e) = self
                .send(&remaining, &WebSocketMessage::roster_updated(room_key, roster))
                .await
            {
                warn!(
                    room_key = %room_key,
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to broadcast roster after disconnect"
                );
            }
        }

        self.connection_manager
            .remove_connection(connection_id)
            .await;

        info!(
            connection_id = %connection_id,
            rooms_notified = affected.len(),
            "Connection disconnected"
        );
    }

    pub async fn roster(&self, room_key: &str) -> Roster {
        self.registry.lock().await.roster(room_key)
    }

    pub async fn rooms_of(&self, connection_id: ConnectionId) -> Vec<String> {
        self.registry.lock().await.rooms_of(connection_id)
    }

    pub async fn active_rooms(&self) -> Vec<String> {
        self.registry.lock().await.active_rooms()
    }

    pub async fn is_consistent(&self) -> bool {
        self.registry.lock().await.is_consistent()
    }

    async fn send(
        &self,
        recipients: &[ConnectionId],
        message: &WebSocketMessage,
    ) -> Result<(), RelayError> {
        if recipients.is_empty() {
            return Ok(());
        }
        let message_json = serde_json::to_string(message)?;
        self.connection_manager
            .send_to_connections(recipients, &message_json)
            .await;
        Ok(())
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, RelayError> {
    serde_json::from_value(payload).map_err(|e| RelayError::MalformedEvent(e.to_string()))
}
