use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Opaque identifier assigned to a realtime connection when it is accepted.
/// Backed by a random v4 UUID so ids are never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Point-in-time view of a room's participants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Number of distinct member connections
    pub count: usize,
    /// Display names of members that supplied one, in join order
    pub names: Vec<String>,
}

impl Roster {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// A live collaboration session
#[derive(Debug, Clone, Default)]
pub(crate) struct Room {
    members: Vec<ConnectionId>, // join order
    names: HashMap<ConnectionId, String>,
}

impl Room {
    pub fn has_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn add_member(&mut self, connection_id: ConnectionId) {
        if !self.has_member(&connection_id) {
            self.members.push(connection_id);
        }
    }

    pub fn remove_member(&mut self, connection_id: &ConnectionId) {
        self.members.retain(|c| c != connection_id);
        self.names.remove(connection_id);
    }

    pub fn set_name(&mut self, connection_id: ConnectionId, name: String) {
        self.names.insert(connection_id, name);
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn roster(&self) -> Roster {
        let names = self
            .members
            .iter()
            .filter_map(|c| self.names.get(c).cloned())
            .collect();

        Roster {
            count: self.members.len(),
            names,
        }
    }
}

/// Registry bookkeeping for one connection
#[derive(Debug, Clone, Default)]
pub(crate) struct ConnectionEntry {
    rooms: Vec<String>,
}

impl ConnectionEntry {
    pub fn has_room(&self, room_key: &str) -> bool {
        self.rooms.iter().any(|r| r == room_key)
    }

    pub fn add_room(&mut self, room_key: &str) {
        if !self.has_room(room_key) {
            self.rooms.push(room_key.to_string());
        }
    }

    pub fn remove_room(&mut self, room_key: &str) {
        self.rooms.retain(|r| r != room_key);
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }
}
