//! The `Broadcaster` trait: the fan-out capability the session layer uses.
//!
//! The session handler decides WHO should receive an event. A broadcaster
//! knows HOW to reach them. Keeping this behind a trait lets tests swap in
//! a recorder and lets another transport bring its own grouping.

use roomchat_protocol::ServerEvent;
use roomchat_transport::ConnectionId;

/// Delivers server events to single connections or to room groups.
///
/// The three audiences the chat needs map onto two methods:
///
/// ```text
/// to me only          emit_to_connection(me, ev)
/// to room except me   emit_to(room, ev, Some(me))
/// to whole room       emit_to(room, ev, None)
/// ```
///
/// Delivery is best effort. A connection whose receiver is gone is skipped
/// silently.
pub trait Broadcaster: Send + 'static {
    /// Adds a connection to a room's broadcast group.
    fn join_group(&mut self, conn: ConnectionId, room: &str);

    /// Sends an event to every connection in the room's group, optionally
    /// skipping one of them.
    fn emit_to(
        &self,
        room: &str,
        event: ServerEvent,
        excluding: Option<ConnectionId>,
    );

    /// Sends an event to exactly one connection.
    fn emit_to_connection(&self, conn: ConnectionId, event: ServerEvent);
}
