//! Per-connection chat sessions for roomchat.
//!
//! A [`ChatSession`] turns decoded [`ClientEvent`](roomchat_protocol::ClientEvent)s
//! into registry updates and broadcasts. All sessions of a server share
//! one [`ChatHub`], which holds the presence registry, the broadcaster,
//! and the [`ContentFilter`].
//!
//! The session never touches a socket. Outbound events go through the
//! [`Broadcaster`](roomchat_room::Broadcaster) trait and acknowledgements
//! are returned to the caller, which makes the whole state machine
//! testable without a network.

mod config;
mod error;
mod filter;
mod hub;
mod session;

pub use config::{SessionConfig, UnjoinedPolicy, UnknownPolicy};
pub use error::SessionError;
pub use filter::{ContentFilter, WordListFilter};
pub use hub::ChatHub;
pub use session::{ChatSession, SessionState};
