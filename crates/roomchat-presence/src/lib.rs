//! Presence tracking for roomchat.
//!
//! Knows which connection joined as which user in which room:
//!
//! - [`PresenceRegistry`]: add/remove/lookup, plus room listings
//! - [`User`]: one joined connection
//! - [`PresenceError`]: why a join was refused
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (above)  ← drives the registry from connection events
//!     ↕
//! Presence Layer (this crate)  ← connection → {username, room}
//!     ↕
//! Transport / Protocol (below)  ← ConnectionId, roster wire types
//! ```

mod error;
mod registry;
mod user;

pub use error::PresenceError;
pub use registry::PresenceRegistry;
pub use user::{normalize, User};
