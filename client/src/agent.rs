//! Connection to the sketch server.
//!
//! DESIGN
//! ======
//! `ClientAgent::connect` dials the server and spawns two tasks:
//! - listener: decodes each line from the server, applies it to the local
//!   sketch, and asks the renderer to redraw. Malformed lines, including
//!   oversized and non-UTF-8 ones, are logged and skipped. On EOF or a read error it publishes `HungUp` and stops.
//! - writer: drains the outbound queue to the socket.
//!
//! Sends are synchronous and never block, so they can be issued straight
//! from input handlers. Dropping the agent closes the outbound queue, which
//! shuts the write half and lets the server tear the session down.

#[cfg(test)]
#[path = "agent_test.rs"]
mod agent_test;

use canvas::SharedSketch;
use futures::{SinkExt, StreamExt};
use protocol::{Command, ErrorCode, Inbound, LineCodec, ProtocolError};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use crate::error::ClientError;

// =============================================================================
// REDRAW
// =============================================================================

/// The rendering collaborator, told to repaint after a remote change lands.
pub trait Redraw: Send + Sync + 'static {
    fn redraw(&self);
}

impl<F> Redraw for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn redraw(&self) {
        self();
    }
}

// =============================================================================
// STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The listener is reading from the server.
    Connected,
    /// The server closed the connection or reading failed.
    HungUp,
}

// =============================================================================
// AGENT
// =============================================================================

pub struct ClientAgent {
    sketch: SharedSketch,
    outbound: mpsc::UnboundedSender<String>,
    status: watch::Receiver<ConnectionStatus>,
    writer: JoinHandle<()>,
}

impl ClientAgent {
    /// Dial `addr` and start mirroring the server's sketch into `sketch`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] if the server cannot be reached.
    pub async fn connect(addr: &str, sketch: SharedSketch, redraw: impl Redraw) -> Result<Self, ClientError> {
        info!(%addr, "client: connecting");
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Connect { addr: addr.to_owned(), source })?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!(error = %e, "client: set_nodelay failed");
        }
        info!(%addr, "client: connected");

        let (read_half, write_half) = stream.into_split();
        let (outbound, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(ConnectionStatus::Connected);

        tokio::spawn(listen(read_half, sketch.clone(), redraw, status_tx));
        let writer = tokio::spawn(write(write_half, rx));

        Ok(Self { sketch, outbound, status, writer })
    }

    /// Queue one command for the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] once the connection is down.
    pub fn send(&self, command: &Command) -> Result<(), ClientError> {
        self.send_line(&command.to_string())
    }

    /// Queue one raw line (without its newline) for the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] once the connection is down.
    pub fn send_line(&self, line: &str) -> Result<(), ClientError> {
        if self.is_hung_up() {
            return Err(ClientError::Closed);
        }
        self.outbound
            .send(line.to_owned())
            .map_err(|_| ClientError::Closed)
    }

    /// The local mirror of the server's sketch.
    #[must_use]
    pub fn sketch(&self) -> &SharedSketch {
        &self.sketch
    }

    /// A receiver that observes connection status changes.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    #[must_use]
    pub fn is_hung_up(&self) -> bool {
        *self.status.borrow() == ConnectionStatus::HungUp
    }

    /// Resolve once the listener has stopped.
    pub async fn wait_closed(&self) {
        let mut status = self.status.clone();
        // An error means the listener dropped its sender, which it only does
        // after publishing `HungUp`.
        if status.wait_for(|s| *s == ConnectionStatus::HungUp).await.is_err() {
            debug!("client: status channel closed");
        }
    }

    /// Flush every queued line, then shut the write half.
    pub async fn close(self) {
        drop(self.outbound);
        if let Err(e) = self.writer.await {
            warn!(error = %e, "client: writer task failed");
        }
    }
}

// =============================================================================
// TASKS
// =============================================================================

async fn listen(
    read_half: OwnedReadHalf,
    sketch: SharedSketch,
    redraw: impl Redraw,
    status: watch::Sender<ConnectionStatus>,
) {
    let mut lines = FramedRead::new(read_half, LineCodec::new());
    while let Some(item) = lines.next().await {
        match item {
            Ok(Inbound::Line(line)) => {
                if apply_line(&sketch, &line) {
                    redraw.redraw();
                }
            }
            Ok(Inbound::Oversized) => dropped(&ProtocolError::TooLong),
            Ok(Inbound::Malformed) => dropped(&ProtocolError::InvalidUtf8),
            Err(e) => {
                warn!(error = %e, "client: read failed");
                break;
            }
        }
    }
    info!("client: server hung up");
    status.send_replace(ConnectionStatus::HungUp);
}

fn dropped(e: &ProtocolError) {
    warn!(error = %e, code = e.error_code(), "client: dropped line");
}

/// Apply one line from the server. Returns whether it decoded.
fn apply_line(sketch: &SharedSketch, line: &str) -> bool {
    match Command::parse(line) {
        Ok(command) => {
            let applied = sketch.update(|s| command.apply(s));
            debug!(verb = command.verb(), ?applied, "client: applied");
            true
        }
        Err(ProtocolError::Empty) => false,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), line, "client: dropped line");
            false
        }
    }
}

async fn write(write_half: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    let mut sink = FramedWrite::new(write_half, LineCodec::new());
    while let Some(line) = rx.recv().await {
        if let Err(e) = sink.send(line).await {
            warn!(error = %e, "client: write failed");
            return;
        }
    }
    if let Err(e) = SinkExt::<String>::close(&mut sink).await {
        debug!(error = %e, "client: shutdown failed");
    }
}
