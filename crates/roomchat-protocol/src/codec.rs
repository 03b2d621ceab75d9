//! Codec trait and implementations for encoding/decoding wire events.
//!
//! The server is generic over [`Codec`] so the frame format can change
//! without touching the session or room layers. Frames are text because
//! browser clients read them straight off a WebSocket `message` event.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Converts wire events to text frames and back.
///
/// `Send + Sync + 'static` because one codec instance lives in the shared
/// server state and is used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented
    /// in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a received frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do
    /// not match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use roomchat_protocol::{ClientEvent, Codec, JsonCodec};
///
/// let codec = JsonCodec;
/// let frame = br#"{"event":"sendMessage","ack":7,"body":"hi"}"#;
/// let event: ClientEvent = codec.decode(frame).unwrap();
/// assert_eq!(event.ack_id(), Some(7));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{AckPayload, ClientEvent, ServerEvent};

    #[test]
    fn test_decode_malformed_frame_returns_decode_error() {
        let result: Result<ClientEvent, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_event_returns_decode_error() {
        let result: Result<ClientEvent, _> =
            JsonCodec.decode(br#"{"event":"increment"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_encode_produces_text_frame() {
        let frame = JsonCodec
            .encode(&ServerEvent::Ack {
                id: 1,
                reply: AckPayload::delivered(),
            })
            .unwrap();
        assert_eq!(frame, r#"{"event":"ack","id":1,"reply":"Delivered"}"#);
    }
}
