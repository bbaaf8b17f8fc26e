//! Test assertion helpers - fluent API for verifying test expectations
#![allow(dead_code)] // Test utilities may not all be used in every test

use liveboard::{MessageType, WebSocketMessage};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct MessageAssertion<'a> {
    setup: &'a TestSetup,
    clients: Vec<&'a str>,
}

impl<'a> MessageAssertion<'a> {
    /// Create an assertion for every client in the setup
    pub fn for_all_clients(setup: &'a TestSetup) -> Self {
        let clients = setup.clients.iter().map(|(label, _)| label.as_str()).collect();
        Self { setup, clients }
    }

    /// Create an assertion for specific clients
    pub fn for_clients(setup: &'a TestSetup, clients: Vec<&'a str>) -> Self {
        Self { setup, clients }
    }

    /// Assert that clients received a specific message type (consumes the message from queue)
    pub async fn received_message_type(self, expected_type: MessageType) -> MessageContent {
        let mut messages = vec![];

        for client in &self.clients {
            let message = self
                .setup
                .mock_conn_manager
                .consume_message_for(self.setup.id(client))
                .await;
            assert!(
                message.is_some(),
                "{} should have received a message",
                client
            );

            let msg: WebSocketMessage = serde_json::from_str(&message.unwrap()).unwrap();
            assert_eq!(
                msg.message_type, expected_type,
                "{} received wrong message type",
                client
            );
            messages.push(msg);
        }

        // Every recipient of a broadcast sees the same payload
        if messages.len() > 1 {
            let first_payload = &messages[0].payload;
            for (i, msg) in messages.iter().enumerate().skip(1) {
                assert_eq!(
                    &msg.payload, first_payload,
                    "Client {} payload differs from client {}",
                    self.clients[i], self.clients[0]
                );
            }
        }

        MessageContent {
            message: messages.remove(0),
        }
    }

    /// Assert that clients have no pending messages
    pub async fn received_no_messages(self) {
        for client in &self.clients {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(self.setup.id(client))
                .await;
            assert!(
                messages.is_empty(),
                "{} should not have received any messages, got {:?}",
                client,
                messages
            );
        }
    }

    /// Count how many messages of a specific type a client has pending (non-consuming)
    pub async fn count_message_type(&self, client: &str, msg_type: MessageType) -> usize {
        self.setup
            .mock_conn_manager
            .get_messages_for(self.setup.id(client))
            .await
            .iter()
            .filter_map(|msg_str| serde_json::from_str::<WebSocketMessage>(msg_str).ok())
            .filter(|msg| msg.message_type == msg_type)
            .count()
    }

    /// Assert that clients' pending messages have exactly these types, in order
    pub async fn received_message_sequence(self, expected_types: Vec<MessageType>) {
        for client in &self.clients {
            let messages = self
                .setup
                .mock_conn_manager
                .get_messages_for(self.setup.id(client))
                .await;
            let actual: Vec<MessageType> = messages
                .iter()
                .map(|raw| {
                    serde_json::from_str::<WebSocketMessage>(raw)
                        .unwrap_or_else(|e| panic!("Failed to parse message for {}: {}", client, e))
                        .message_type
                })
                .collect();

            assert_eq!(actual, expected_types, "{} saw wrong message order", client);
        }
    }
}

// ============================================================================
// Message Content Assertions
// ============================================================================

pub struct MessageContent {
    message: WebSocketMessage,
}

impl MessageContent {
    pub fn payload(&self) -> &serde_json::Value {
        &self.message.payload
    }

    /// Assert the roster belongs to a specific room
    pub fn with_room_key(self, expected: &str) -> Self {
        assert_eq!(self.message.payload["roomKey"], expected);
        self
    }

    /// Assert the roster count
    pub fn with_count(self, expected: usize) -> Self {
        assert_eq!(self.message.payload["count"], expected);
        self
    }

    /// Assert the roster names, ignoring order
    pub fn with_names(self, expected: Vec<&str>) -> Self {
        let mut actual: Vec<String> =
            serde_json::from_value(self.message.payload["names"].clone()).unwrap();
        let mut expected: Vec<String> = expected.into_iter().map(|s| s.to_string()).collect();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected);
        self
    }

    /// Assert a relayed mutation carries the given inner payload
    pub fn with_mutation(self, expected: serde_json::Value) -> Self {
        assert_eq!(self.message.payload["payload"], expected);
        self
    }

    /// Assert the message is stamped with the original sender
    pub fn from_sender(self, expected: liveboard::ConnectionId) -> Self {
        let meta = self.message.meta.as_ref().expect("message should carry meta");
        assert_eq!(meta.connection_id, Some(expected));
        self
    }
}
