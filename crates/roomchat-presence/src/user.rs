//! The registry's record of a joined connection.

use roomchat_protocol::Member;
use roomchat_transport::ConnectionId;

/// A connection that has joined a room under a name.
///
/// `username` and `room` are stored normalized (see [`normalize`]) and
/// never change after the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: ConnectionId,
    pub username: String,
    pub room: String,
}

impl User {
    /// The wire view of this user, as listed in a room roster.
    pub fn member(&self) -> Member {
        Member {
            username: self.username.clone(),
            room: self.room.clone(),
        }
    }
}

/// Trims and lower-cases a username or room name.
///
/// All duplicate checks and room lookups compare normalized values, which
/// makes them case-insensitive.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  Alice "), "alice");
        assert_eq!(normalize("LOBBY"), "lobby");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_member_drops_connection_id() {
        let user = User {
            id: ConnectionId::new(3),
            username: "alice".into(),
            room: "lobby".into(),
        };
        let member = user.member();
        assert_eq!(member.username, "alice");
        assert_eq!(member.room, "lobby");
    }
}
