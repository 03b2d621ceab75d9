//! Error types for the presence registry.

use roomchat_transport::ConnectionId;

/// Reasons the registry refuses to add a user.
///
/// The display strings are shown to clients verbatim in join
/// acknowledgements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenceError {
    /// Username or room was empty after trimming.
    #[error("Username and room are required")]
    Validation,

    /// Someone in the room already uses this name (case-insensitive).
    #[error("Username is in use")]
    RoomNameConflict { username: String, room: String },

    /// The connection already has a user. A connection joins at most once.
    #[error("{0} has already joined a room")]
    AlreadyRegistered(ConnectionId),
}
