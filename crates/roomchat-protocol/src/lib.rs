//! Wire protocol for roomchat.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Envelope`],
//!   [`RoomData`], [`AckPayload`]): the frames that travel on the wire.
//! - **Formatting** ([`format`]): builds timestamped envelopes for chat
//!   lines, location shares and admin notices.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how frames are converted
//!   to and from text.
//!
//! The protocol layer knows nothing about connections or rooms. It only
//! knows the shape of the messages.
//!
//! ```text
//! Transport (frames) → Protocol (events) → Session (user + room context)
//! ```

mod codec;
mod error;
pub mod format;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AckPayload, ClientEvent, Envelope, EnvelopeKind, Member, RoomData,
    ServerEvent,
};
