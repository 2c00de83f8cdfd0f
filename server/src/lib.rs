//! Broadcast server for the shared sketch.
//!
//! ARCHITECTURE
//! ============
//! ```text
//! TcpListener ──accept──▶ session::serve (one task per connection)
//!                              │ parse line
//!                              ▼
//!                         AppState::submit ── hub lock ──▶ apply to canonical Sketch
//!                                                     └──▶ queue line for every other session
//! ```
//!
//! The server keeps the canonical sketch, relays every valid line to every
//! other client, and seeds newcomers with one `draw` line per shape. There is
//! no heartbeat or idle timeout; a half-open connection stays registered
//! until a write to it fails.

pub mod config;
pub mod session;
pub mod state;

use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub use config::{ConfigError, ServerConfig};
pub use state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A bound listener plus the state every session shares.
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, state: AppState::new(config.outbound_capacity) })
    }

    /// # Errors
    ///
    /// Returns the OS error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Accept connections forever, one task per session.
    ///
    /// # Errors
    ///
    /// Never returns `Ok`; an error is only returned if the listener's local
    /// address cannot be read at startup.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        info!(%addr, "server: listening");
        info!("server: no heartbeat, idle connections stay open until a write fails");

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%peer, error = %e, "server: set_nodelay failed");
                    }
                    tokio::spawn(session::serve(self.state.clone(), stream, peer));
                }
                // Accept errors are per-connection; keep serving.
                Err(e) => warn!(error = %e, "server: accept failed"),
            }
        }
    }

    /// Run the accept loop on a background task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<Result<(), ServerError>> {
        tokio::spawn(self.run())
    }
}
