//! In-memory broadcast groups over per-connection channels.
//!
//! Each connection registers an unbounded sender when it is accepted. A
//! writer task on the other end drains it onto the socket, so emitting
//! never waits on the network.

use std::collections::{HashMap, HashSet};

use roomchat_protocol::ServerEvent;
use roomchat_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::{Broadcaster, RoomError};

/// Channel sender for delivering outbound events to one connection.
pub type ConnectionSender = mpsc::UnboundedSender<ServerEvent>;

/// Tracks every live connection's outbound channel and which room groups
/// it belongs to.
///
/// `groups` and `memberships` are two views of the same relation and are
/// always updated together.
#[derive(Debug, Default)]
pub struct RoomGroups {
    /// Outbound channel per registered connection.
    senders: HashMap<ConnectionId, ConnectionSender>,

    /// Room name → connections in its group.
    groups: HashMap<String, HashSet<ConnectionId>>,

    /// Connection → rooms it joined. Lets `unregister` avoid a full scan.
    memberships: HashMap<ConnectionId, HashSet<String>>,
}

impl RoomGroups {
    /// Creates an empty set of groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the outbound channel for a newly accepted connection.
    ///
    /// # Errors
    /// Returns [`RoomError::AlreadyRegistered`] if the id is already known.
    pub fn register(
        &mut self,
        conn: ConnectionId,
        sender: ConnectionSender,
    ) -> Result<(), RoomError> {
        if self.senders.contains_key(&conn) {
            return Err(RoomError::AlreadyRegistered(conn));
        }
        self.senders.insert(conn, sender);
        tracing::debug!(%conn, "connection registered");
        Ok(())
    }

    /// Drops a connection from every group and forgets its channel.
    ///
    /// Groups left empty are removed. Unregistering an unknown connection
    /// is a no-op.
    pub fn unregister(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);
        let rooms = self.memberships.remove(&conn).unwrap_or_default();
        for room in rooms {
            if let Some(members) = self.groups.get_mut(&room) {
                members.remove(&conn);
                if members.is_empty() {
                    self.groups.remove(&room);
                    tracing::debug!(%room, "group emptied");
                }
            }
        }
        tracing::debug!(%conn, "connection unregistered");
    }

    /// Returns the connections currently in a room's group, sorted.
    pub fn group_members(&self, room: &str) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self
            .groups
            .get(room)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    /// Returns `true` if the connection is in the room's group.
    pub fn is_member(&self, conn: ConnectionId, room: &str) -> bool {
        self.groups
            .get(room)
            .is_some_and(|members| members.contains(&conn))
    }

    /// Returns the number of non-empty groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }

    /// Sends to one connection. Silently drops if the receiver is gone.
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(event);
        }
    }
}

impl Broadcaster for RoomGroups {
    fn join_group(&mut self, conn: ConnectionId, room: &str) {
        if !self.senders.contains_key(&conn) {
            tracing::warn!(%conn, %room, "join_group for unregistered connection, ignoring");
            return;
        }
        self.groups
            .entry(room.to_string())
            .or_default()
            .insert(conn);
        self.memberships
            .entry(conn)
            .or_default()
            .insert(room.to_string());
    }

    fn emit_to(
        &self,
        room: &str,
        event: ServerEvent,
        excluding: Option<ConnectionId>,
    ) {
        let Some(members) = self.groups.get(room) else {
            return;
        };
        for conn in members {
            if Some(*conn) != excluding {
                self.send_to(*conn, event.clone());
            }
        }
    }

    fn emit_to_connection(&self, conn: ConnectionId, event: ServerEvent) {
        self.send_to(conn, event);
    }
}
