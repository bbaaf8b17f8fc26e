use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::presence::ConnectionId;

/// Simple WebSocket abstraction - all we care about is send/receive
#[async_trait]
pub trait SocketWrapper: Send {
    /// Send a text message to the client
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Receive the next text message from the client (None if connection closed)
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Handler for incoming WebSocket messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle an incoming message from the client
    async fn handle_message(&self, connection_id: ConnectionId, message: String);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

/// Direct implementation on axum's WebSocket
#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        loop {
            match self.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Binary, ping and pong frames carry no relay events
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(SocketError::ReceiveFailed(e.to_string())),
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Why a connection's pump loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client sent a close frame or the stream ended
    ClientClosed,
    /// The relay dropped the outbound sender for this connection
    OutboundDropped,
}

/// A managed WebSocket connection.
///
/// Pumps outbound messages queued by the connection manager to the client and
/// hands every inbound text frame to the message handler, one at a time, so a
/// single connection's events are processed in the order they arrived.
pub struct Connection {
    pub connection_id: ConnectionId,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<String>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        connection_id: ConnectionId,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<String>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            connection_id,
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Pumps frames both ways until either side goes away.
    ///
    /// A socket error ends the loop early and is returned without sending a
    /// close frame; the caller still owns disconnect cleanup in every case.
    pub async fn run(mut self) -> Result<CloseReason, SocketError> {
        let reason = loop {
            tokio::select! {
                outbound = self.outbound_receiver.recv() => match outbound {
                    Some(frame) => self.socket.send_message(frame).await?,
                    None => break CloseReason::OutboundDropped,
                },
                inbound = self.socket.receive_message() => match inbound? {
                    Some(frame) => {
                        self.message_handler
                            .handle_message(self.connection_id, frame)
                            .await
                    }
                    None => break CloseReason::ClientClosed,
                },
            }
        };

        if let Err(e) = self.socket.close().await {
            debug!(
                connection_id = %self.connection_id,
                error = %e,
                "Close frame not delivered"
            );
        }
        Ok(reason)
    }
}
