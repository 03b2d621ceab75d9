//! Message formatting: builds the envelopes clients render.
//!
//! These are pure functions. The only input besides the arguments is the
//! wall clock, and the `*_at` variants take the timestamp explicitly.

use chrono::{DateTime, Utc};

use crate::{Envelope, EnvelopeKind};

/// Sender name used for server-generated notices.
pub const ADMIN_SENDER: &str = "Admin";

/// Body of the greeting sent to a connection that just joined.
pub const WELCOME: &str = "Welcome";

/// Builds a text envelope stamped with the current time.
pub fn format_text(sender: &str, body: &str) -> Envelope {
    format_text_at(sender, body, Utc::now())
}

/// Builds a text envelope with an explicit timestamp.
pub fn format_text_at(
    sender: &str,
    body: &str,
    created_at: DateTime<Utc>,
) -> Envelope {
    Envelope {
        kind: EnvelopeKind::Text,
        sender: sender.to_string(),
        body: body.to_string(),
        created_at,
    }
}

/// Builds a location envelope stamped with the current time.
pub fn format_location(sender: &str, url: &str) -> Envelope {
    format_location_at(sender, url, Utc::now())
}

/// Builds a location envelope with an explicit timestamp.
pub fn format_location_at(
    sender: &str,
    url: &str,
    created_at: DateTime<Utc>,
) -> Envelope {
    Envelope {
        kind: EnvelopeKind::Location,
        sender: sender.to_string(),
        body: url.to_string(),
        created_at,
    }
}

/// Builds the map link for a coordinate pair.
///
/// Uses the shortest representation that parses back to the same `f64`,
/// so `40.7` stays `40.7` and `-74.0` becomes `-74`.
pub fn map_link(latitude: f64, longitude: f64) -> String {
    format!("https://google.com/maps?q={latitude},{longitude}")
}

/// Admin notice broadcast when someone enters a room.
pub fn joined_notice(username: &str) -> Envelope {
    format_text(ADMIN_SENDER, &format!("{username} has joined"))
}

/// Admin notice broadcast when someone leaves a room.
pub fn left_notice(username: &str) -> Envelope {
    format_text(ADMIN_SENDER, &format!("{username} has left"))
}

/// Greeting sent only to the connection that joined.
pub fn welcome() -> Envelope {
    format_text(ADMIN_SENDER, WELCOME)
}
