use std::collections::HashSet;
use std::fmt;
use dashmap::DashMap;
use log::debug;
use serde::Serialize;
use uuid::Uuid;
use crate::broadcast::RoomKey;

/// Opaque id of one live client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        ConnectionId(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tracks which rooms each connection joined and which connections sit in each room.
///
/// Both sides live in a `DashMap`, so joins in one room never wait on another room's shard.
/// A mutation that touches both maps always takes the connection entry first and the room
/// entry second. `join` holds the connection entry while it inserts into the room, and
/// `drop_connection` removes the connection entry before it clears the rooms, so a join racing
/// a teardown either lands before it (and gets cleared) or sees no connection (and is skipped).
///
/// Nothing here performs I/O, delivery is the job of the [`RoomRouter`](crate::broadcast::RoomRouter).
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<ConnectionId, HashSet<RoomKey>>,
    rooms: DashMap<RoomKey, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {

    pub fn new() -> Self {
        Self::default()
    }

    /// Called on transport-level connect, before the connection may join anything.
    pub fn register(&self, connection_id: ConnectionId) {
        self.connections.entry(connection_id).or_default();
    }

    /// Idempotent. Joining for a connection that is already gone is a no-op.
    pub fn join(&self, connection_id: ConnectionId, room: RoomKey) -> bool {
        let Some(mut memberships) = self.connections.get_mut(&connection_id) else {
            debug!("Ignoring join of {room} for unknown connection {connection_id}");
            return false;
        };
        if !memberships.insert(room) {
            return false;
        }
        self.rooms.entry(room).or_default().insert(connection_id);
        debug!("Connection {connection_id} joined {room}");
        true
    }

    /// Idempotent. Leaving a room that was never joined is a no-op.
    pub fn leave(&self, connection_id: ConnectionId, room: &RoomKey) -> bool {
        let Some(mut memberships) = self.connections.get_mut(&connection_id) else {
            return false;
        };
        if !memberships.remove(room) {
            return false;
        }
        self.remove_member(room, &connection_id);
        debug!("Connection {connection_id} left {room}");
        true
    }

    /// Removes the connection from every room it belonged to. Returns the rooms it left.
    pub fn drop_connection(&self, connection_id: ConnectionId) -> Vec<RoomKey> {
        let Some((_, memberships)) = self.connections.remove(&connection_id) else {
            return Vec::new();
        };
        for room in &memberships {
            self.remove_member(room, &connection_id);
        }
        debug!("Dropped connection {connection_id} from {} room(s)", memberships.len());
        memberships.into_iter().collect()
    }

    /// Member set of the room as of this call, empty when nobody joined.
    pub fn members_of(&self, room: &RoomKey) -> HashSet<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.value().clone())
            .unwrap_or_default()
    }

    pub fn rooms_of(&self, connection_id: ConnectionId) -> HashSet<RoomKey> {
        self.connections
            .get(&connection_id)
            .map(|memberships| memberships.value().clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.connections.contains_key(&connection_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn remove_member(&self, room: &RoomKey, connection_id: &ConnectionId) {
        if let Some(mut members) = self.rooms.get_mut(room) {
            members.remove(connection_id);
        }
        // empty rooms are pruned, a room only exists while somebody is in it
        self.rooms.remove_if(room, |_, members| members.is_empty());
    }
}
