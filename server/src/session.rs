//! One TCP connection.
//!
//! LIFECYCLE
//! =========
//! 1. Accepted: generate a client id, register with the hub and receive the
//!    seed (one `draw` line per existing shape).
//! 2. Serving: a writer task sends the seed, then every line queued for this
//!    session. The reader decodes lines; each valid command is applied to the
//!    canonical sketch and forwarded to all other sessions. Malformed lines,
//!    including oversized and non-UTF-8 ones, are logged and dropped.
//! 3. Closed: on EOF, a read error, or eviction by the hub, deregister and
//!    let the writer drain.

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use protocol::{Applied, Command, ErrorCode, Inbound, LineCodec, ProtocolError};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{AppState, Joined, Line};

/// Serve one connection until it closes.
pub async fn serve(state: AppState, stream: TcpStream, peer: SocketAddr) {
    let client_id = Uuid::new_v4();
    let (read_half, write_half) = stream.into_split();
    let mut lines = FramedRead::new(read_half, LineCodec::new());

    let Joined { seed, rx } = state.join(client_id).await;
    info!(%client_id, %peer, seeded = seed.len(), "server: someone connected");

    let mut writer = tokio::spawn(write_lines(client_id, FramedWrite::new(write_half, LineCodec::new()), seed, rx));

    loop {
        tokio::select! {
            item = lines.next() => {
                match item {
                    Some(Ok(Inbound::Line(line))) => dispatch(&state, client_id, &line).await,
                    Some(Ok(Inbound::Oversized)) => dropped(client_id, &ProtocolError::TooLong),
                    Some(Ok(Inbound::Malformed)) => dropped(client_id, &ProtocolError::InvalidUtf8),
                    Some(Err(e)) => {
                        warn!(%client_id, error = %e, "server: read failed");
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut writer => {
                // Writer stops early only when evicted or the socket broke.
                info!(%client_id, "server: writer stopped");
                break;
            }
        }
    }

    state.leave(client_id).await;
    if !writer.is_finished() {
        if let Err(e) = writer.await {
            warn!(%client_id, error = %e, "server: writer task failed");
        }
    }
    info!(%client_id, %peer, "server: disconnected");
}

async fn dispatch(state: &AppState, client_id: Uuid, line: &str) {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(ProtocolError::Empty) => return,
        Err(e) => {
            warn!(%client_id, error = %e, code = e.error_code(), line, "server: dropped line");
            return;
        }
    };

    match state.submit(client_id, line, &command).await {
        Applied::Added(id) => debug!(%client_id, id, "server: shape added"),
        Applied::Changed => debug!(%client_id, verb = command.verb(), "server: shape changed"),
        Applied::Stale => debug!(%client_id, verb = command.verb(), target = ?command.target(), "server: stale id"),
        Applied::Exhausted => warn!(%client_id, "server: shape ids exhausted, draw not applied"),
    }
}

fn dropped(client_id: Uuid, e: &ProtocolError) {
    warn!(%client_id, error = %e, code = e.error_code(), "server: dropped line");
}

async fn write_lines(
    client_id: Uuid,
    mut sink: FramedWrite<OwnedWriteHalf, LineCodec>,
    seed: Vec<Line>,
    mut rx: mpsc::Receiver<Line>,
) {
    for line in seed {
        if let Err(e) = sink.feed(line).await {
            warn!(%client_id, error = %e, "server: seed write failed");
            return;
        }
    }
    if let Err(e) = SinkExt::<Line>::flush(&mut sink).await {
        warn!(%client_id, error = %e, "server: seed write failed");
        return;
    }

    while let Some(line) = rx.recv().await {
        if let Err(e) = sink.send(line).await {
            warn!(%client_id, error = %e, "server: write failed");
            return;
        }
    }
}
