//! The chat hub: shared state every session operates on.

use roomchat_presence::PresenceRegistry;
use roomchat_room::Broadcaster;

use crate::{ContentFilter, SessionConfig};

/// Owns the presence registry together with the broadcaster and content
/// filter the sessions use.
///
/// There is one hub per server. It is created when the server is built
/// and dropped at shutdown. Sessions receive it as `&mut` for the duration
/// of a single event, which is what serializes all registry access.
pub struct ChatHub<B: Broadcaster, F: ContentFilter> {
    pub(crate) registry: PresenceRegistry,
    pub(crate) groups: B,
    pub(crate) filter: F,
    pub(crate) config: SessionConfig,
}

impl<B: Broadcaster, F: ContentFilter> ChatHub<B, F> {
    /// Creates a hub with an empty registry.
    pub fn new(groups: B, filter: F, config: SessionConfig) -> Self {
        Self {
            registry: PresenceRegistry::new(),
            groups,
            filter,
            config,
        }
    }

    pub fn registry(&self) -> &PresenceRegistry {
        &self.registry
    }

    pub fn groups(&self) -> &B {
        &self.groups
    }

    /// Mutable access to the broadcaster, for the transport side to
    /// register and clean up connections.
    pub fn groups_mut(&mut self) -> &mut B {
        &mut self.groups
    }
}
