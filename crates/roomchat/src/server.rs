//! `RoomchatServer` builder and accept loop.
//!
//! This is the entry point for running a chat relay. It ties together all
//! the layers: transport → protocol → session → room groups.

use std::sync::Arc;
use std::time::Duration;

use roomchat_protocol::{Codec, JsonCodec};
use roomchat_room::RoomGroups;
use roomchat_session::{ChatHub, ContentFilter, SessionConfig, WordListFilter};
use roomchat_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::RoomchatError;

/// How long an accepted socket may take to finish its WebSocket upgrade
/// before it is dropped.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared server state passed to each connection handler task.
///
/// The whole hub sits behind one lock. Holding it for the length of a
/// single event is what keeps registry updates and broadcasts atomic.
pub(crate) struct ServerState<F: ContentFilter, C: Codec> {
    pub(crate) hub: Mutex<ChatHub<RoomGroups, F>>,
    pub(crate) codec: C,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a roomchat server.
///
/// # Example
///
/// ```rust,ignore
/// use roomchat::prelude::*;
///
/// let server = RoomchatServer::builder()
///     .bind("0.0.0.0:3000")
///     .build(WordListFilter::default())
///     .await?;
/// server.run().await
/// ```
pub struct RoomchatServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    handshake_timeout: Duration,
}

impl RoomchatServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            session_config: SessionConfig::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets how long a new socket may take to complete its WebSocket
    /// upgrade. Defaults to [`DEFAULT_HANDSHAKE_TIMEOUT`].
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and builds the server around the given content
    /// filter.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<F: ContentFilter>(
        self,
        filter: F,
    ) -> Result<RoomchatServer<F, JsonCodec>, RoomchatError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let hub = ChatHub::new(RoomGroups::new(), filter, self.session_config);
        let state = Arc::new(ServerState {
            hub: Mutex::new(hub),
            codec: JsonCodec,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(RoomchatServer { transport, state })
    }
}

impl Default for RoomchatServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound roomchat server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RoomchatServer<F: ContentFilter, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<F, C>>,
}

impl RoomchatServer<WordListFilter, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> RoomchatServerBuilder {
        RoomchatServerBuilder::new()
    }
}

impl<F, C> RoomchatServer<F, C>
where
    F: ContentFilter,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop.
    ///
    /// Spawns a handler task for each accepted socket. The WebSocket
    /// upgrade runs inside that task, so a peer that never completes it
    /// only holds up itself. Accept failures are logged and the loop
    /// carries on. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), RoomchatError> {
        match self.local_addr() {
            Ok(addr) => tracing::info!(%addr, "roomchat server listening"),
            Err(_) => tracing::info!("roomchat server running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(pending, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
