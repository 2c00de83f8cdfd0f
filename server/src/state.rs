//! Shared server state.
//!
//! DESIGN
//! ======
//! `AppState` holds the canonical sketch and the hub: the set of live
//! sessions keyed by client id, each with a bounded sender feeding that
//! session's writer task. The hub mutex is the single arbitration point.
//! Applying a command and fanning its line out happen under one guard, as do
//! snapshotting the sketch for a new session and registering it. Every
//! session therefore sees the same total order, and a new session's seed
//! reflects exactly the lines broadcast before it joined.
//!
//! Fan-out never blocks: a session whose queue is full or whose writer has
//! gone is evicted rather than skipped, so no connected session misses a
//! line.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::HashMap;
use std::sync::Arc;

use canvas::{SharedSketch, Sketch};
use protocol::{Applied, Command};
use tokio::sync::{Mutex, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::config::DEFAULT_OUTBOUND_CAPACITY;

/// One outbound protocol line, shared across every recipient.
pub type Line = Arc<str>;

// =============================================================================
// HUB
// =============================================================================

/// Registered sessions: `client_id` -> sender for outgoing lines.
#[derive(Default)]
pub struct Hub {
    sessions: HashMap<Uuid, mpsc::Sender<Line>>,
}

impl Hub {
    /// Queue `line` for every session except `exclude`, evicting any session
    /// that cannot accept it. Returns the evicted ids.
    fn broadcast(&mut self, line: &Line, exclude: Option<Uuid>) -> Vec<Uuid> {
        let mut evicted = Vec::new();
        for (client_id, tx) in &self.sessions {
            if exclude == Some(*client_id) {
                continue;
            }
            if let Err(e) = tx.try_send(Arc::clone(line)) {
                warn!(%client_id, error = %e, "server: evicting session");
                evicted.push(*client_id);
            }
        }
        for client_id in &evicted {
            self.sessions.remove(client_id);
        }
        evicted
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// What a newly registered session must send before anything else.
pub struct Joined {
    /// One `draw` line per existing shape, in insertion order.
    pub seed: Vec<Line>,
    /// Lines broadcast after registration.
    pub rx: mpsc::Receiver<Line>,
}

/// Cloneable handle shared by the accept loop and every session.
#[derive(Clone)]
pub struct AppState {
    sketch: SharedSketch,
    hub: Arc<Mutex<Hub>>,
    outbound_capacity: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOUND_CAPACITY)
    }
}

impl AppState {
    #[must_use]
    pub fn new(outbound_capacity: usize) -> Self {
        Self::with_sketch(Sketch::new(), outbound_capacity)
    }

    /// Start from an existing canonical sketch.
    #[must_use]
    pub fn with_sketch(sketch: Sketch, outbound_capacity: usize) -> Self {
        Self {
            sketch: SharedSketch::from_sketch(sketch),
            hub: Arc::new(Mutex::new(Hub::default())),
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// The canonical sketch.
    #[must_use]
    pub fn sketch(&self) -> &SharedSketch {
        &self.sketch
    }

    /// Number of registered sessions.
    pub async fn client_count(&self) -> usize {
        self.hub.lock().await.sessions.len()
    }

    /// Snapshot the sketch and register `client_id` in one step.
    pub async fn join(&self, client_id: Uuid) -> Joined {
        let mut hub = self.hub.lock().await;
        let seed = self
            .sketch
            .snapshot()
            .into_iter()
            .map(|(_, shape)| Line::from(Command::Draw(shape).to_string()))
            .collect();
        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        hub.sessions.insert(client_id, tx);
        Joined { seed, rx }
    }

    /// Deregister `client_id`. Its writer drains what is queued and stops.
    pub async fn leave(&self, client_id: Uuid) -> bool {
        self.hub.lock().await.sessions.remove(&client_id).is_some()
    }

    /// Apply `command` to the canonical sketch and forward `line` verbatim
    /// to every other session. A `draw` refused for lack of ids is not
    /// forwarded.
    pub async fn submit(&self, client_id: Uuid, line: &str, command: &Command) -> Applied {
        let mut hub = self.hub.lock().await;
        let applied = self.sketch.update(|sketch| command.apply(sketch));
        if applied != Applied::Exhausted {
            hub.broadcast(&Line::from(line), Some(client_id));
        }
        applied
    }
}
