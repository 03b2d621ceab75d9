//! Core protocol types for roomchat's wire format.
//!
//! Every frame is a JSON object tagged by its `"event"` field, so a
//! browser client can dispatch on `frame.event` the same way it would with
//! named socket events:
//!
//! ```text
//! client → server   join | sendMessage | sendLocation
//! server → client   message | locationMessage | roomData | ack
//! ```
//!
//! Client events may carry an `ack` id. When present, the server answers
//! that specific request with exactly one `ack` frame echoing the id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// A request sent by a client.
///
/// `username`, `room` and `body` default to empty strings when missing so
/// that an incomplete join reaches the registry and is rejected with a
/// validation error instead of being dropped as an undecodable frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join a named room under a display name.
    Join {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ack: Option<u64>,
        #[serde(default)]
        username: String,
        #[serde(default)]
        room: String,
    },

    /// Send a chat line to the caller's room.
    SendMessage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ack: Option<u64>,
        #[serde(default)]
        body: String,
    },

    /// Share a position with the caller's room.
    SendLocation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ack: Option<u64>,
        latitude: f64,
        longitude: f64,
    },
}

impl ClientEvent {
    /// The acknowledgement id the client asked to be answered on, if any.
    pub fn ack_id(&self) -> Option<u64> {
        match self {
            Self::Join { ack, .. }
            | Self::SendMessage { ack, .. }
            | Self::SendLocation { ack, .. } => *ack,
        }
    }

    /// The wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::SendMessage { .. } => "sendMessage",
            Self::SendLocation { .. } => "sendLocation",
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// What an [`Envelope`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    /// A chat line or an admin notice.
    Text,
    /// A map link.
    Location,
}

/// A formatted, timestamped message as delivered to clients.
///
/// `createdAt` travels as milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub sender: String,
    pub body: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Room roster
// ---------------------------------------------------------------------------

/// One entry of a room roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub username: String,
    pub room: String,
}

/// A room's name together with everyone currently in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomData {
    pub room: String,
    pub users: Vec<Member>,
}

impl RoomData {
    /// Returns `true` if a member with this (normalized) username is listed.
    pub fn contains(&self, username: &str) -> bool {
        self.users.iter().any(|m| m.username == username)
    }
}

// ---------------------------------------------------------------------------
// Acknowledgements
// ---------------------------------------------------------------------------

/// The reply half of a client request.
///
/// Serialized untagged, so the `reply` field of an `ack` frame is one of:
///
/// ```text
/// null                          success, nothing to say
/// "Delivered"                   a status string
/// {"error": "Username is in use"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AckPayload {
    Error { error: String },
    Status(String),
    Empty,
}

impl AckPayload {
    /// The status a chat line is acknowledged with.
    pub const DELIVERED: &'static str = "Delivered";

    /// A successful acknowledgement carrying no value.
    pub fn ok() -> Self {
        Self::Empty
    }

    /// The acknowledgement for a delivered chat line.
    pub fn delivered() -> Self {
        Self::Status(Self::DELIVERED.to_string())
    }

    /// An error acknowledgement with the error's display text.
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error {
            error: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The error text, if this is an error acknowledgement.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server pushes to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A chat line or admin notice.
    Message(Envelope),

    /// A shared location.
    LocationMessage(Envelope),

    /// The current roster of a room.
    RoomData(RoomData),

    /// The answer to the client request with the same ack id.
    Ack { id: u64, reply: AckPayload },
}

impl ServerEvent {
    /// The wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::LocationMessage(_) => "locationMessage",
            Self::RoomData(_) => "roomData",
            Self::Ack { .. } => "ack",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at_epoch_ms(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    // =====================================================================
    // ClientEvent
    // =====================================================================

    #[test]
    fn test_client_event_join_decodes_flat_payload() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join",
            "ack": 1,
            "username": "alice",
            "room": "lobby",
        }))
        .unwrap();

        assert_eq!(
            event,
            ClientEvent::Join {
                ack: Some(1),
                username: "alice".into(),
                room: "lobby".into(),
            }
        );
        assert_eq!(event.ack_id(), Some(1));
        assert_eq!(event.name(), "join");
    }

    #[test]
    fn test_client_event_join_missing_fields_default_to_empty() {
        let event: ClientEvent =
            serde_json::from_value(json!({ "event": "join" })).unwrap();
        assert_eq!(
            event,
            ClientEvent::Join {
                ack: None,
                username: String::new(),
                room: String::new(),
            }
        );
    }

    #[test]
    fn test_client_event_send_location_requires_coordinates() {
        let result: Result<ClientEvent, _> = serde_json::from_value(json!({
            "event": "sendLocation",
            "latitude": 1.0,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_client_event_send_message_without_ack() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "sendMessage",
            "body": "hello",
        }))
        .unwrap();
        assert_eq!(event.ack_id(), None);
        assert_eq!(event.name(), "sendMessage");
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_server_event_message_wire_shape() {
        let event = ServerEvent::Message(Envelope {
            kind: EnvelopeKind::Text,
            sender: "bob".into(),
            body: "hello".into(),
            created_at: at_epoch_ms(1_700_000_000_000),
        });

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "message",
                "kind": "text",
                "sender": "bob",
                "body": "hello",
                "createdAt": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn test_server_event_room_data_wire_shape() {
        let event = ServerEvent::RoomData(RoomData {
            room: "lobby".into(),
            users: vec![Member {
                username: "alice".into(),
                room: "lobby".into(),
            }],
        });

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "roomData",
                "room": "lobby",
                "users": [{ "username": "alice", "room": "lobby" }],
            })
        );
    }

    #[test]
    fn test_server_event_location_message_tag() {
        let event = ServerEvent::LocationMessage(Envelope {
            kind: EnvelopeKind::Location,
            sender: "alice".into(),
            body: "https://google.com/maps?q=1,2".into(),
            created_at: at_epoch_ms(0),
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "locationMessage");
        assert_eq!(value["kind"], "location");
    }

    #[test]
    fn test_server_event_decodes_what_it_encodes() {
        let event = ServerEvent::Message(Envelope {
            kind: EnvelopeKind::Text,
            sender: "Admin".into(),
            body: "Welcome".into(),
            created_at: at_epoch_ms(42),
        });
        let text = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }

    // =====================================================================
    // AckPayload
    // =====================================================================

    #[test]
    fn test_ack_payload_wire_shapes() {
        let ack = |reply| ServerEvent::Ack { id: 9, reply };

        assert_eq!(
            serde_json::to_value(ack(AckPayload::ok())).unwrap(),
            json!({ "event": "ack", "id": 9, "reply": null })
        );
        assert_eq!(
            serde_json::to_value(ack(AckPayload::delivered())).unwrap(),
            json!({ "event": "ack", "id": 9, "reply": "Delivered" })
        );
        assert_eq!(
            serde_json::to_value(ack(AckPayload::error("Username is in use")))
                .unwrap(),
            json!({
                "event": "ack",
                "id": 9,
                "reply": { "error": "Username is in use" },
            })
        );
    }

    #[test]
    fn test_ack_payload_decodes_each_shape() {
        let decode = |v: serde_json::Value| -> AckPayload {
            match serde_json::from_value(json!({
                "event": "ack", "id": 1, "reply": v,
            }))
            .unwrap()
            {
                ServerEvent::Ack { reply, .. } => reply,
                other => panic!("expected ack, got {other:?}"),
            }
        };

        assert_eq!(decode(json!(null)), AckPayload::Empty);
        assert_eq!(decode(json!("Delivered")), AckPayload::delivered());
        assert_eq!(
            decode(json!({ "error": "nope" })).error_message(),
            Some("nope")
        );
    }

    #[test]
    fn test_room_data_contains() {
        let data = RoomData {
            room: "lobby".into(),
            users: vec![Member {
                username: "alice".into(),
                room: "lobby".into(),
            }],
        };
        assert!(data.contains("alice"));
        assert!(!data.contains("bob"));
    }
}
