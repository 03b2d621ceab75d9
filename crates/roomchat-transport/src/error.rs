//! Error types for the transport layer.

/// Errors that can occur while accepting, reading from, or writing to a
/// client connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer went away while we were still writing to it.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Writing a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or completing the WebSocket upgrade failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
