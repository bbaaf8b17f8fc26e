#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use liveboard::{ConnectionId, ConnectionManager};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Records every outbound message per connection, in send order
#[derive(Clone, Default)]
pub struct MockConnectionManager {
    sent_messages: Arc<RwLock<HashMap<ConnectionId, VecDeque<String>>>>,
    connected: Arc<RwLock<Vec<ConnectionId>>>,
}

impl MockConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_messages_for(&self, connection_id: ConnectionId) -> Vec<String> {
        self.sent_messages
            .read()
            .await
            .get(&connection_id)
            .map(|queue| queue.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Pops the oldest message queued for a connection
    pub async fn consume_message_for(&self, connection_id: ConnectionId) -> Option<String> {
        self.sent_messages
            .write()
            .await
            .get_mut(&connection_id)
            .and_then(|queue| queue.pop_front())
    }

    pub async fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.connected.read().await.contains(&connection_id)
    }

    pub async fn clear_messages(&self) {
        self.sent_messages.write().await.clear();
    }
}

#[async_trait]
impl ConnectionManager for MockConnectionManager {
    async fn add_connection(
        &self,
        connection_id: ConnectionId,
        _sender: mpsc::UnboundedSender<String>,
    ) {
        self.connected.write().await.push(connection_id);
    }

    async fn remove_connection(&self, connection_id: ConnectionId) {
        self.connected.write().await.retain(|c| *c != connection_id);
    }

    async fn send_to_connection(&self, connection_id: ConnectionId, message: &str) {
        self.sent_messages
            .write()
            .await
            .entry(connection_id)
            .or_default()
            .push_back(message.to_string());
    }

    async fn send_to_connections(&self, connection_ids: &[ConnectionId], message: &str) {
        for connection_id in connection_ids {
            self.send_to_connection(*connection_id, message).await;
        }
    }
}
