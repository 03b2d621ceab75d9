//! Error types for the session layer.
//!
//! None of these are fatal. Each one is reported to the client that
//! triggered it through the acknowledgement channel and the connection
//! carries on, so the display strings are written for end users.

use roomchat_presence::PresenceError;

/// Why a client request was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The registry refused the join (empty name, name taken, ...).
    #[error(transparent)]
    Presence(#[from] PresenceError),

    /// The message body failed the content filter.
    #[error("Profanity is not allowed")]
    Profanity,

    /// The connection sent a message or location before joining.
    #[error("Join a room before sending messages")]
    Unjoined,

    /// The connection tried to join a second time.
    #[error("Already joined a room")]
    AlreadyJoined,

    /// A shared location had a NaN or infinite coordinate.
    #[error("Latitude and longitude must be finite numbers")]
    InvalidLocation,
}
