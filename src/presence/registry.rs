use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::models::{ConnectionEntry, ConnectionId, Roster, Room};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenceError {
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Room key must not be empty")]
    EmptyRoomKey,
}

/// Authoritative room <-> connection membership.
///
/// Both directions are updated together by every mutating operation, so a
/// connection is listed in a room exactly when the room is listed on the
/// connection. Rooms are created on first join and removed as soon as their
/// last member goes away.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the bookkeeping entry for a freshly accepted connection
    #[instrument(skip(self))]
    pub fn register_connection(&mut self, connection_id: ConnectionId) {
        if self.connections.contains_key(&connection_id) {
            debug!(connection_id = %connection_id, "Connection already registered");
            return;
        }
        self.connections
            .insert(connection_id, ConnectionEntry::default());
        debug!(connection_id = %connection_id, "Connection registered");
    }

    #[instrument(skip(self))]
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_key: &str,
    ) -> Result<Roster, PresenceError> {
        if room_key.is_empty() {
            return Err(PresenceError::EmptyRoomKey);
        }

        let entry = self
            .connections
            .get_mut(&connection_id)
            .ok_or(PresenceError::UnknownConnection(connection_id))?;

        let room = self.rooms.entry(room_key.to_string()).or_default();

        if entry.has_room(room_key) {
            debug!(
                room_key = %room_key,
                connection_id = %connection_id,
                "Connection already in room"
            );
            return Ok(room.roster());
        }

        room.add_member(connection_id);
        entry.add_room(room_key);

        let roster = room.roster();
        info!(
            room_key = %room_key,
            connection_id = %connection_id,
            member_count = roster.count,
            "Connection joined room"
        );

        Ok(roster)
    }

    /// Records or overwrites the name a member uses in a room.
    /// Does nothing when the connection is not a member of that room.
    #[instrument(skip(self))]
    pub fn set_display_name(
        &mut self,
        connection_id: ConnectionId,
        room_key: &str,
        name: &str,
    ) -> Result<(), PresenceError> {
        let entry = self
            .connections
            .get(&connection_id)
            .ok_or(PresenceError::UnknownConnection(connection_id))?;

        if !entry.has_room(room_key) {
            debug!(
                room_key = %room_key,
                connection_id = %connection_id,
                "Ignoring display name for non-member"
            );
            return Ok(());
        }

        if let Some(room) = self.rooms.get_mut(room_key) {
            room.set_name(connection_id, name.to_string());
        }

        Ok(())
    }

    pub fn roster(&self, room_key: &str) -> Roster {
        self.rooms
            .get(room_key)
            .map(Room::roster)
            .unwrap_or_default()
    }

    /// Removes a connection from one room.
    ///
    /// Returns the roster left behind, which has a count of zero when the room
    /// was deleted, or `None` when there was no membership to remove.
    #[instrument(skip(self))]
    pub fn leave(&mut self, connection_id: ConnectionId, room_key: &str) -> Option<Roster> {
        let Some(entry) = self.connections.get_mut(&connection_id) else {
            warn!(connection_id = %connection_id, "Leave for unknown connection");
            return None;
        };

        if !entry.has_room(room_key) {
            debug!(
                room_key = %room_key,
                connection_id = %connection_id,
                "Connection not in room"
            );
            return None;
        }

        entry.remove_room(room_key);
        Some(self.remove_from_room(connection_id, room_key))
    }

    /// Removes a connection from every room it belongs to and forgets it.
    /// Returns the post-removal roster for each affected room.
    #[instrument(skip(self))]
    pub fn drop_connection(&mut self, connection_id: ConnectionId) -> Vec<(String, Roster)> {
        let Some(entry) = self.connections.remove(&connection_id) else {
            debug!(connection_id = %connection_id, "Connection already dropped");
            return Vec::new();
        };

        let affected: Vec<(String, Roster)> = entry
            .rooms()
            .iter()
            .map(|room_key| {
                let roster = self.remove_from_room(connection_id, room_key);
                (room_key.clone(), roster)
            })
            .collect();

        info!(
            connection_id = %connection_id,
            rooms_left = affected.len(),
            "Connection dropped"
        );

        affected
    }

    fn remove_from_room(&mut self, connection_id: ConnectionId, room_key: &str) -> Roster {
        let Some(room) = self.rooms.get_mut(room_key) else {
            return Roster::empty();
        };

        room.remove_member(&connection_id);
        let roster = room.roster();

        if room.is_empty() {
            info!(room_key = %room_key, "Room is now empty, deleting");
            self.rooms.remove(room_key);
        } else {
            info!(
                room_key = %room_key,
                connection_id = %connection_id,
                member_count = roster.count,
                "Connection left room"
            );
        }

        roster
    }

    /// Member connections of a room in join order
    pub fn members(&self, room_key: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room_key)
            .map(|room| room.members().to_vec())
            .unwrap_or_default()
    }

    pub fn is_member(&self, connection_id: ConnectionId, room_key: &str) -> bool {
        self.connections
            .get(&connection_id)
            .map(|entry| entry.has_room(room_key))
            .unwrap_or(false)
    }

    pub fn rooms_of(&self, connection_id: ConnectionId) -> Vec<String> {
        self.connections
            .get(&connection_id)
            .map(|entry| entry.rooms().to_vec())
            .unwrap_or_default()
    }

    pub fn active_rooms(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.rooms.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn contains_connection(&self, connection_id: ConnectionId) -> bool {
        self.connections.contains_key(&connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Checks that room and connection membership agree in both directions
    pub fn is_consistent(&self) -> bool {
        let rooms_agree = self.rooms.iter().all(|(key, room)| {
            !room.is_empty()
                && room.members().iter().all(|c| {
                    self.connections
                        .get(c)
                        .map(|entry| entry.has_room(key))
                        .unwrap_or(false)
                })
        });

        let connections_agree = self.connections.iter().all(|(c, entry)| {
            entry.rooms().iter().all(|key| {
                self.rooms
                    .get(key)
                    .map(|room| room.has_member(c))
                    .unwrap_or(false)
            })
        });

        rooms_agree && connections_agree
    }
}
