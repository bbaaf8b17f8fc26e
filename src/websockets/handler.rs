use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::presence::ConnectionId;
use crate::relay::{EventRelay, RelayError};
use crate::shared::AppState;
use crate::websockets::messages::WebSocketMessage;

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
pub struct WebsocketReceiveHandler {
    relay: Arc<EventRelay>,
}

impl WebsocketReceiveHandler {
    pub fn new(relay: Arc<EventRelay>) -> Self {
        Self { relay }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: ConnectionId, message: String) {
        let result = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => self.relay.handle_event(connection_id, ws_message).await,
            Err(e) => Err(RelayError::MalformedEvent(e.to_string())),
        };

        // Nothing is reported back to the client; a bad event is simply dropped
        match result {
            Ok(()) => {}
            Err(e) if e.is_client_fault() => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Dropping inbound event"
                );
            }
            Err(e) => {
                error!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to handle inbound event"
                );
            }
        }
    }
}

/// WebSocket endpoint
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    info!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: axum::extract::ws::WebSocket, app_state: AppState) {
    let connection_id = ConnectionId::new();
    info!(connection_id = %connection_id, "WebSocket connection established");

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    if let Err(e) = app_state.relay.connect(connection_id, outbound_sender).await {
        error!(connection_id = %connection_id, error = %e, "Failed to register connection");
        app_state.relay.handle_disconnect(connection_id).await;
        return;
    }

    let message_handler = Arc::new(WebsocketReceiveHandler::new(app_state.relay.clone()));

    let connection = Connection::new(
        connection_id,
        Box::new(socket),
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(reason) => {
            info!(
                connection_id = %connection_id,
                reason = ?reason,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: drop from every room and notify whoever is left
    app_state.relay.handle_disconnect(connection_id).await;
}
