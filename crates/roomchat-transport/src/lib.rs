//! Transport layer for roomchat.
//!
//! Provides the [`Transport`] and [`Connection`] traits the server is
//! written against, plus the default WebSocket implementation.
//!
//! Every accepted socket gets a [`ConnectionId`]. The rest of the stack
//! (presence registry, broadcast groups, session handler) refers to a
//! client only through that id and never owns the socket itself.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    PendingWebSocket, WebSocketConnection, WebSocketTransport,
};

use std::fmt;
use std::net::SocketAddr;

/// Opaque identifier for one client's live session.
///
/// Ids are handed out in increasing order, so sorting by id yields
/// connection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
///
/// Accepting only takes the raw socket off the listener. The protocol
/// handshake is a separate step ([`Handshake::complete`]) so a slow or
/// silent peer can be upgraded on its own task without holding up the
/// accept loop.
pub trait Transport: Send + Sync + 'static {
    /// An accepted socket that has not finished its handshake yet.
    type Pending: Handshake;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming socket.
    async fn accept(&mut self) -> Result<Self::Pending, Self::Error>;

    /// Returns the address the transport is listening on.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// The second half of accepting: turns a raw socket into a [`Connection`].
pub trait Handshake: Send + 'static {
    /// The connection type produced once the handshake succeeds.
    type Connection: Connection;
    /// The error type for a failed handshake.
    type Error: std::error::Error + Send + Sync;

    /// Runs the handshake to completion. Callers bound it with a timeout.
    async fn complete(self) -> Result<Self::Connection, Self::Error>;
}

/// A single client connection carrying text frames.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next frame from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}
