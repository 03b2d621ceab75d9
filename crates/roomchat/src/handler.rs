//! Per-connection handler: upgrade, channel registration, event routing,
//! cleanup.
//!
//! Each accepted socket gets its own Tokio task running this handler.
//! The flow is:
//!   1. Complete the WebSocket upgrade within the handshake timeout
//!   2. Register an outbound channel with the room groups
//!   3. Spawn a writer task that drains the channel onto the socket
//!   4. Loop: receive frames → decode → run through the session → ack
//!   5. On close or error: disconnect the session, unregister, stop writer

use std::sync::Arc;

use roomchat_protocol::{ClientEvent, Codec, ServerEvent};
use roomchat_room::{Broadcaster, RoomGroups};
use roomchat_session::{ChatHub, ChatSession, ContentFilter};
use roomchat_transport::{
    Connection, ConnectionId, Handshake, PendingWebSocket, WebSocketConnection,
};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::RoomchatError;

/// Drop guard that releases a connection's user and channel when the
/// handler exits without reaching its own cleanup.
///
/// That only happens if the handler panics or its task is aborted. Since
/// `Drop` is synchronous, the release runs on a spawned task that takes
/// the hub lock.
struct ConnectionGuard<F: ContentFilter, C: Codec> {
    conn_id: ConnectionId,
    state: Arc<ServerState<F, C>>,
    armed: bool,
}

impl<F: ContentFilter, C: Codec> ConnectionGuard<F, C> {
    fn new(conn_id: ConnectionId, state: Arc<ServerState<F, C>>) -> Self {
        Self {
            conn_id,
            state,
            armed: true,
        }
    }

    /// Called once the handler has cleaned up itself.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<F: ContentFilter, C: Codec> Drop for ConnectionGuard<F, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let conn_id = self.conn_id;
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%conn_id, "no runtime left to release connection");
            return;
        };
        tracing::warn!(%conn_id, "handler exited early, releasing connection");
        let state = Arc::clone(&self.state);
        runtime.spawn(async move {
            let mut guard = state.hub.lock().await;
            release(&mut *guard, &mut ChatSession::new(conn_id));
        });
    }
}

/// Disconnects the session and forgets the connection's channel.
///
/// Dropping the sender ends the writer once it has flushed.
fn release<F: ContentFilter>(
    hub: &mut ChatHub<RoomGroups, F>,
    session: &mut ChatSession,
) {
    let conn_id = session.id();
    if let Some(user) = session.disconnect(hub) {
        tracing::info!(
            %conn_id,
            username = %user.username,
            room = %user.room,
            "user left"
        );
    }
    hub.groups_mut().unregister(conn_id);
}

/// Handles a single accepted socket from upgrade to close.
pub(crate) async fn handle_connection<F, C>(
    pending: PendingWebSocket,
    state: Arc<ServerState<F, C>>,
) -> Result<(), RoomchatError>
where
    F: ContentFilter,
    C: Codec,
{
    let conn_id = pending.id();
    let conn =
        match tokio::time::timeout(state.handshake_timeout, pending.complete())
            .await
        {
            Ok(Ok(conn)) => Arc::new(conn),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(RoomchatError::HandshakeTimeout(conn_id)),
        };
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    state.hub.lock().await.groups_mut().register(conn_id, tx)?;
    let mut cleanup = ConnectionGuard::new(conn_id, Arc::clone(&state));

    let writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        rx,
        Arc::clone(&state),
    ));

    let mut session = ChatSession::new(conn_id);
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode frame");
                continue;
            }
        };
        tracing::debug!(%conn_id, event = event.name(), "event received");

        let mut guard = state.hub.lock().await;
        let hub = &mut *guard;
        if let Some((id, reply)) = session.handle(hub, event) {
            hub.groups()
                .emit_to_connection(conn_id, ServerEvent::Ack { id, reply });
        }
    }

    release(&mut *state.hub.lock().await, &mut session);
    cleanup.disarm();

    if let Err(e) = writer.await {
        tracing::warn!(%conn_id, error = %e, "writer task failed");
    }
    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close after disconnect");
    }
    Ok(())
}

/// Encodes queued events and writes them to the socket in order.
async fn write_loop<F, C>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<F, C>>,
) where
    F: ContentFilter,
    C: Codec,
{
    let conn_id = conn.id();
    while let Some(event) = rx.recv().await {
        let text = match state.codec.encode(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    %conn_id,
                    event = event.name(),
                    error = %e,
                    "failed to encode event"
                );
                continue;
            }
        };
        if let Err(e) = conn.send(&text).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use roomchat_protocol::JsonCodec;
    use roomchat_session::{SessionConfig, WordListFilter};
    use tokio::sync::Mutex;

    fn test_state() -> Arc<ServerState<WordListFilter, JsonCodec>> {
        Arc::new(ServerState {
            hub: Mutex::new(ChatHub::new(
                RoomGroups::new(),
                WordListFilter::default(),
                SessionConfig::default(),
            )),
            codec: JsonCodec,
            handshake_timeout: Duration::from_secs(1),
        })
    }

    /// Registers a connection, joins it to "lobby" and returns its inbox.
    async fn joined(
        state: &ServerState<WordListFilter, JsonCodec>,
        id: u64,
        username: &str,
    ) -> mpsc::UnboundedReceiver<ServerEvent> {
        let conn_id = ConnectionId::new(id);
        let (tx, rx) = mpsc::unbounded_channel();
        let mut guard = state.hub.lock().await;
        let hub = &mut *guard;
        hub.groups_mut().register(conn_id, tx).unwrap();
        ChatSession::new(conn_id).join(hub, username, "lobby");
        rx
    }

    #[tokio::test]
    async fn test_connection_guard_drop_releases_user_and_channel() {
        let state = test_state();
        let _alice = joined(&state, 1, "alice").await;
        let mut bob = joined(&state, 2, "bob").await;
        while bob.try_recv().is_ok() {}

        drop(ConnectionGuard::new(ConnectionId::new(1), Arc::clone(&state)));

        // The release runs on a spawned task.
        let mut released = false;
        for _ in 0..50 {
            if state.hub.lock().await.registry().len() == 1 {
                released = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(released, "alice should have been removed");

        let hub = state.hub.lock().await;
        assert!(hub.registry().get_user(ConnectionId::new(1)).is_none());
        assert_eq!(hub.groups().connection_count(), 1);
        match bob.try_recv() {
            Ok(ServerEvent::Message(env)) => {
                assert_eq!(env.body, "alice has left");
            }
            other => panic!("expected left notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_guard_disarmed_leaves_state_alone() {
        let state = test_state();
        let _alice = joined(&state, 1, "alice").await;

        let mut guard =
            ConnectionGuard::new(ConnectionId::new(1), Arc::clone(&state));
        guard.disarm();
        drop(guard);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let hub = state.hub.lock().await;
        assert_eq!(hub.registry().len(), 1);
        assert_eq!(hub.groups().connection_count(), 1);
    }

    #[tokio::test]
    async fn test_aborted_handler_task_frees_username() {
        let state = test_state();
        let _alice = joined(&state, 1, "alice").await;

        // A task that owns the guard and never finishes, like a handler
        // parked on `recv`.
        let task_state = Arc::clone(&state);
        let task = tokio::spawn(async move {
            let _cleanup =
                ConnectionGuard::new(ConnectionId::new(1), task_state);
            std::future::pending::<()>().await;
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        task.abort();
        let _ = task.await;

        let mut retry = ChatSession::new(ConnectionId::new(3));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut ack = None;
        for _ in 0..50 {
            let mut guard = state.hub.lock().await;
            let hub = &mut *guard;
            if hub.registry().is_empty() {
                assert_eq!(hub.groups().connection_count(), 0);
                hub.groups_mut()
                    .register(ConnectionId::new(3), tx.clone())
                    .unwrap();
                ack = retry.join(hub, "alice", "lobby");
                break;
            }
            drop(guard);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ack, Some(roomchat_protocol::AckPayload::ok()));
    }
}
