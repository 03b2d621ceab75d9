//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the problem is in turning events into
//! frames or frames into events, never in networking or room bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into a frame).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning a frame into an event).
    ///
    /// Common causes: malformed JSON, an unknown `event` tag, or a
    /// payload field with the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
