#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::{json, Value};

use liveboard::{MessageHandler, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a WebSocket message as if it arrived on a client's socket
    pub async fn send_message(&self, client: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.send_raw(client, &message_json).await;
    }

    /// Send an arbitrary text frame
    pub async fn send_raw(&self, client: &str, raw: &str) {
        self.input_handler
            .handle_message(self.id(client), raw.to_string())
            .await;
    }

    /// Simulate the transport reporting a closed socket
    pub async fn disconnect(&self, client: &str) {
        self.relay.handle_disconnect(self.id(client)).await;
    }

    /// Clear all recorded messages
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn send_join(&self, client: &str, room_key: &str) {
        self.send_message(client, WebSocketMessage::join_room(room_key, None))
            .await;
    }

    pub async fn send_join_as(&self, client: &str, room_key: &str, display_name: &str) {
        self.send_message(
            client,
            WebSocketMessage::join_room(room_key, Some(display_name)),
        )
        .await;
    }

    pub async fn send_leave(&self, client: &str, room_key: &str) {
        self.send_message(client, WebSocketMessage::leave_room(room_key))
            .await;
    }

    pub async fn send_mutation(&self, client: &str, room_key: &str, payload: Value) {
        self.send_message(client, WebSocketMessage::mutate(room_key, payload))
            .await;
    }

    /// Send a whiteboard stroke point
    pub async fn send_draw(&self, client: &str, room_key: &str, x: f64, y: f64, color: &str) {
        self.send_mutation(
            client,
            room_key,
            json!({ "kind": "draw", "x": x, "y": y, "color": color }),
        )
        .await;
    }

    pub async fn send_todo_add(&self, client: &str, room_key: &str, id: &str, text: &str) {
        self.send_mutation(
            client,
            room_key,
            json!({ "kind": "todo-add", "id": id, "text": text }),
        )
        .await;
    }
}
