//! # roomchat
//!
//! Real-time room chat relay over WebSockets.
//!
//! Clients connect, join a named room under a display name, and exchange
//! text messages and shared locations with everyone else in that room.
//! The server keeps the presence registry, filters profanity, and pushes
//! join/leave notices and room rosters as membership changes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomchat::prelude::*;
//!
//! # async fn run() -> Result<(), RoomchatError> {
//! let config = ServerConfig::from_env()?;
//! let server = RoomchatServer::builder()
//!     .bind(&config.bind_addr())
//!     .session_config(config.session)
//!     .build(WordListFilter::default())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::RoomchatError;
pub use server::{
    RoomchatServer, RoomchatServerBuilder, DEFAULT_HANDSHAKE_TIMEOUT,
};

/// Everything needed to configure and run a server, plus the wire types
/// for writing clients and tests.
pub mod prelude {
    pub use crate::{
        ConfigError, RoomchatError, RoomchatServer, RoomchatServerBuilder,
        ServerConfig,
    };
    pub use roomchat_presence::PresenceError;
    pub use roomchat_protocol::{
        AckPayload, ClientEvent, Envelope, EnvelopeKind, Member, RoomData,
        ServerEvent,
    };
    pub use roomchat_session::{
        ContentFilter, SessionConfig, SessionError, UnjoinedPolicy,
        WordListFilter,
    };
}
