//! Runs a roomchat relay configured from the environment.
//!
//! ```text
//! PORT=3000 HOST=0.0.0.0 ROOMCHAT_UNJOINED=reject RUST_LOG=info chat-server
//! ```

use roomchat::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), RoomchatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        addr = %config.bind_addr(),
        unjoined = %config.session.unjoined,
        "starting chat server"
    );

    let server = RoomchatServer::builder()
        .bind(&config.bind_addr())
        .session_config(config.session)
        .build(WordListFilter::default())
        .await?;

    server.run().await
}
