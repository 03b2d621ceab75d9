//! Unified error type for the roomchat server.

use roomchat_protocol::ProtocolError;
use roomchat_room::RoomError;
use roomchat_transport::{ConnectionId, TransportError};

use crate::ConfigError;

/// Top-level error that wraps the crate-specific errors the server can
/// hit.
///
/// Client-facing refusals (`SessionError`) are not here. They are
/// answered through acknowledgements and never end a connection.
#[derive(Debug, thiserror::Error)]
pub enum RoomchatError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A broadcast-group error (duplicate connection registration).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An accepted socket did not finish its WebSocket upgrade in time.
    #[error("{0} did not complete the WebSocket handshake in time")]
    HandshakeTimeout(ConnectionId),

    /// The process environment held an invalid setting.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
