#![allow(dead_code)] // Test utilities may not all be used in every test

use std::sync::Arc;
use tokio::sync::mpsc;

use liveboard::{ConnectionId, EventRelay, WebsocketReceiveHandler};

use super::mocks::MockConnectionManager;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub relay: Arc<EventRelay>,
    pub mock_conn_manager: Arc<MockConnectionManager>,
    pub input_handler: WebsocketReceiveHandler,
    /// (label, connection id) in connect order
    pub clients: Vec<(String, ConnectionId)>,
}

impl TestSetup {
    pub fn id(&self, label: &str) -> ConnectionId {
        self.clients
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("unknown test client {}", label))
    }
}

pub struct TestSetupBuilder {
    clients: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self { clients: vec![] }
    }

    pub fn with_clients(mut self, clients: Vec<&str>) -> Self {
        self.clients = clients.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_three_clients(self) -> Self {
        self.with_clients(vec!["alice", "bob", "carol"])
    }

    pub async fn build(self) -> TestSetup {
        let mock_conn_manager = Arc::new(MockConnectionManager::new());
        let relay = Arc::new(EventRelay::new(mock_conn_manager.clone()));

        let mut clients = vec![];
        for label in self.clients {
            let id = ConnectionId::new();
            let (sender, _receiver) = mpsc::unbounded_channel();
            relay.connect(id, sender).await.unwrap();
            clients.push((label, id));
        }

        // Drop the per-connection greeting so tests start from a clean slate
        mock_conn_manager.clear_messages().await;

        let input_handler = WebsocketReceiveHandler::new(relay.clone());

        TestSetup {
            relay,
            mock_conn_manager,
            input_handler,
            clients,
        }
    }
}
