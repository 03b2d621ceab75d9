//! The presence registry: the single source of truth for who is where.
//!
//! It is responsible for:
//! - Validating and normalizing names on join
//! - Rejecting a name that is already taken in the room
//! - Answering "who is this connection?" and "who is in this room?"
//! - Forgetting a connection exactly once when it goes away
//!
//! # Concurrency note
//!
//! `PresenceRegistry` is NOT thread-safe by itself. It is a plain
//! `HashMap` owned by the chat hub, and the server serializes every
//! access through a single mutex around that hub.

use std::collections::HashMap;

use roomchat_protocol::RoomData;
use roomchat_transport::ConnectionId;

use crate::{normalize, PresenceError, User};

/// Maps each joined connection to its [`User`].
///
/// ```text
///  add_user() ──→ [joined] ──→ remove_user() ──→ (gone)
///                    │
///           get_user / users_in_room
/// ```
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    users: HashMap<ConnectionId, User>,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection as `username` in `room`.
    ///
    /// Both values are trimmed and lower-cased before anything else.
    ///
    /// # Errors
    /// - [`PresenceError::Validation`]: a value is empty after trimming
    /// - [`PresenceError::AlreadyRegistered`]: this connection already
    ///   has a user
    /// - [`PresenceError::RoomNameConflict`]: the name is taken in the room
    pub fn add_user(
        &mut self,
        id: ConnectionId,
        username: &str,
        room: &str,
    ) -> Result<&User, PresenceError> {
        let username = normalize(username);
        let room = normalize(room);

        if username.is_empty() || room.is_empty() {
            return Err(PresenceError::Validation);
        }
        if self.users.contains_key(&id) {
            return Err(PresenceError::AlreadyRegistered(id));
        }
        let taken = self
            .users
            .values()
            .any(|u| u.room == room && u.username == username);
        if taken {
            return Err(PresenceError::RoomNameConflict { username, room });
        }

        tracing::info!(conn_id = %id, %username, %room, "user added");

        Ok(self.users.entry(id).or_insert(User { id, username, room }))
    }

    /// Forgets a connection and returns the user it was, if any.
    ///
    /// Removing a connection that never joined (or was already removed)
    /// is not an error. It just returns `None`.
    pub fn remove_user(&mut self, id: ConnectionId) -> Option<User> {
        let removed = self.users.remove(&id);
        if let Some(user) = &removed {
            tracing::info!(
                conn_id = %id,
                username = %user.username,
                room = %user.room,
                "user removed"
            );
        }
        removed
    }

    /// Looks up the user for a connection.
    pub fn get_user(&self, id: ConnectionId) -> Option<&User> {
        self.users.get(&id)
    }

    /// Lists everyone in a room, in connection order.
    ///
    /// The room name is normalized first, so `"Lobby"` and `" lobby "`
    /// find the same users. Returns an empty vec for an unknown room.
    pub fn users_in_room(&self, room: &str) -> Vec<&User> {
        let room = normalize(room);
        let mut users: Vec<&User> =
            self.users.values().filter(|u| u.room == room).collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// The roster broadcast to a room after its membership changes.
    pub fn roster(&self, room: &str) -> RoomData {
        RoomData {
            room: normalize(room),
            users: self
                .users_in_room(room)
                .into_iter()
                .map(User::member)
                .collect(),
        }
    }

    /// Returns the number of joined connections.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if nobody has joined.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
