//! Room broadcast groups for roomchat.
//!
//! A room is not a stored entity here. It is just a named group of
//! connections that share broadcasts. Who is in a room by *name* lives in
//! the presence registry, and this crate only knows where to send bytes.
//!
//! # Key types
//!
//! - [`Broadcaster`]: the fan-out capability the session handler uses
//! - [`RoomGroups`]: in-memory groups over per-connection channels
//! - [`ConnectionSender`]: the outbound half of a connection's channel

mod broadcaster;
mod error;
mod groups;

pub use broadcaster::Broadcaster;
pub use error::RoomError;
pub use groups::{ConnectionSender, RoomGroups};
