//! Error types for the room layer.

use roomchat_transport::ConnectionId;

/// Errors that can occur while managing broadcast groups.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The connection already has an outbound channel registered.
    #[error("{0} is already registered")]
    AlreadyRegistered(ConnectionId),
}
