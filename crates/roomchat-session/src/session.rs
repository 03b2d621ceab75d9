//! The per-connection session: a small state machine driven by client
//! events.
//!
//! ```text
//!   Unjoined ──(join ok)──→ Joined
//!      │  ↑                   │
//!      │  └──(join failed)    │
//!      └──(disconnect)──→ Closed ←──(disconnect)──┘
//! ```
//!
//! Every operation runs to completion against a `&mut ChatHub`, so the
//! registry and the broadcast groups are never observed half-updated.

use roomchat_presence::User;
use roomchat_protocol::format::{self, map_link};
use roomchat_protocol::{AckPayload, ClientEvent, ServerEvent};
use roomchat_room::Broadcaster;
use roomchat_transport::ConnectionId;

use crate::{ChatHub, ContentFilter, SessionError, UnjoinedPolicy};

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected but not in a room yet. `join` may be retried.
    Unjoined,
    /// In a room. Messages and locations are broadcast.
    Joined,
    /// Disconnected. Every further event is ignored.
    Closed,
}

/// One connection's chat session.
#[derive(Debug)]
pub struct ChatSession {
    conn: ConnectionId,
    state: SessionState,
}

impl ChatSession {
    /// Starts a session for a freshly accepted connection.
    pub fn new(conn: ConnectionId) -> Self {
        Self {
            conn,
            state: SessionState::Unjoined,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.conn
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Dispatches a decoded client event.
    ///
    /// Returns the acknowledgement to send, paired with the id the client
    /// asked for. Events without an ack id never produce one.
    pub fn handle<B, F>(
        &mut self,
        hub: &mut ChatHub<B, F>,
        event: ClientEvent,
    ) -> Option<(u64, AckPayload)>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        let ack_id = event.ack_id();
        let reply = match event {
            ClientEvent::Join { username, room, .. } => {
                self.join(hub, &username, &room)
            }
            ClientEvent::SendMessage { body, .. } => {
                self.send_message(hub, &body)
            }
            ClientEvent::SendLocation {
                latitude,
                longitude,
                ..
            } => self.send_location(hub, latitude, longitude),
        };
        Some((ack_id?, reply?))
    }

    /// Joins a room.
    ///
    /// On success, in order: the connection enters the room's broadcast
    /// group, gets a welcome, everyone else is told it joined, and the
    /// whole room receives the new roster.
    ///
    /// Returns `None` only when the session is already closed.
    pub fn join<B, F>(
        &mut self,
        hub: &mut ChatHub<B, F>,
        username: &str,
        room: &str,
    ) -> Option<AckPayload>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        match self.state {
            SessionState::Closed => {
                tracing::debug!(conn = %self.conn, "join on closed session, ignoring");
                return None;
            }
            SessionState::Joined => {
                return Some(AckPayload::error(SessionError::AlreadyJoined));
            }
            SessionState::Unjoined => {}
        }

        let user = match hub.registry.add_user(self.conn, username, room) {
            Ok(user) => user.clone(),
            Err(e) => {
                tracing::debug!(conn = %self.conn, error = %e, "join refused");
                return Some(AckPayload::error(SessionError::from(e)));
            }
        };
        self.state = SessionState::Joined;

        hub.groups.join_group(self.conn, &user.room);
        hub.groups.emit_to_connection(
            self.conn,
            ServerEvent::Message(format::welcome()),
        );
        hub.groups.emit_to(
            &user.room,
            ServerEvent::Message(format::joined_notice(&user.username)),
            Some(self.conn),
        );
        hub.groups.emit_to(
            &user.room,
            ServerEvent::RoomData(hub.registry.roster(&user.room)),
            None,
        );

        Some(AckPayload::ok())
    }

    /// Broadcasts a chat line to the sender's whole room.
    ///
    /// The content filter runs before anything else, so a profane line is
    /// refused even from a connection that never joined.
    pub fn send_message<B, F>(
        &mut self,
        hub: &mut ChatHub<B, F>,
        body: &str,
    ) -> Option<AckPayload>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        if self.state == SessionState::Closed {
            return None;
        }
        if hub.filter.is_profane(body) {
            tracing::debug!(conn = %self.conn, "message rejected by filter");
            return Some(AckPayload::error(SessionError::Profanity));
        }
        let Some(user) = hub.registry.get_user(self.conn) else {
            return self.unjoined(hub);
        };

        hub.groups.emit_to(
            &user.room,
            ServerEvent::Message(format::format_text(&user.username, body)),
            None,
        );
        Some(AckPayload::delivered())
    }

    /// Broadcasts a map link for the given coordinates to the sender's
    /// whole room.
    pub fn send_location<B, F>(
        &mut self,
        hub: &mut ChatHub<B, F>,
        latitude: f64,
        longitude: f64,
    ) -> Option<AckPayload>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        if self.state == SessionState::Closed {
            return None;
        }
        let Some(user) = hub.registry.get_user(self.conn) else {
            return self.unjoined(hub);
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Some(AckPayload::error(SessionError::InvalidLocation));
        }

        let url = map_link(latitude, longitude);
        hub.groups.emit_to(
            &user.room,
            ServerEvent::LocationMessage(format::format_location(
                &user.username,
                &url,
            )),
            None,
        );
        Some(AckPayload::ok())
    }

    /// Ends the session.
    ///
    /// If the connection had joined, its user is removed and the rest of
    /// the room is told it left and gets the shrunken roster. Calling this
    /// again, or for a connection that never joined, broadcasts nothing.
    pub fn disconnect<B, F>(&mut self, hub: &mut ChatHub<B, F>) -> Option<User>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        if self.state == SessionState::Closed {
            return None;
        }
        self.state = SessionState::Closed;

        let user = hub.registry.remove_user(self.conn)?;
        hub.groups.emit_to(
            &user.room,
            ServerEvent::Message(format::left_notice(&user.username)),
            Some(self.conn),
        );
        hub.groups.emit_to(
            &user.room,
            ServerEvent::RoomData(hub.registry.roster(&user.room)),
            Some(self.conn),
        );
        Some(user)
    }

    /// Answers a send from a connection with no user record.
    fn unjoined<B, F>(&self, hub: &ChatHub<B, F>) -> Option<AckPayload>
    where
        B: Broadcaster,
        F: ContentFilter,
    {
        match hub.config.unjoined {
            UnjoinedPolicy::Reject => {
                tracing::warn!(conn = %self.conn, "send before join, rejecting");
                Some(AckPayload::error(SessionError::Unjoined))
            }
            UnjoinedPolicy::Ignore => {
                tracing::debug!(conn = %self.conn, "send before join, ignoring");
                None
            }
        }
    }
}
