//! Observer registry and event fan-out.
//!
//! Every observer owns an unbounded channel. Emitting never blocks. Only
//! streamed `task_log` lines are capped: once an observer has `capacity`
//! unread lines queued, further lines are dropped for that observer while
//! every other event is still delivered. A closed channel is pruned. Events
//! to one observer keep their emit order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use tpanel_core::{EventBroadcaster, EventTarget, ObserverId, PanelEvent};

pub use mpsc::error::TryRecvError;

const fn is_task_output(event: &PanelEvent) -> bool {
    matches!(event, PanelEvent::TaskLog { .. })
}

/// Sending half held by the hub.
struct ObserverQueue {
    tx: mpsc::UnboundedSender<PanelEvent>,
    queued_lines: Arc<AtomicUsize>,
}

/// Receiving half handed to the transport.
#[derive(Debug)]
pub struct ObserverEvents {
    rx: mpsc::UnboundedReceiver<PanelEvent>,
    queued_lines: Arc<AtomicUsize>,
}

impl ObserverEvents {
    /// Next event, or `None` once the observer has been deregistered.
    pub async fn recv(&mut self) -> Option<PanelEvent> {
        let event = self.rx.recv().await?;
        self.consumed(&event);
        Some(event)
    }

    pub fn try_recv(&mut self) -> Result<PanelEvent, TryRecvError> {
        let event = self.rx.try_recv()?;
        self.consumed(&event);
        Ok(event)
    }

    fn consumed(&self, event: &PanelEvent) {
        if is_task_output(event) {
            self.queued_lines.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

/// Outcome of a single delivery attempt.
enum Delivery {
    Sent,
    Dropped,
    Closed,
}

fn deliver(id: ObserverId, queue: &ObserverQueue, line_cap: usize, event: PanelEvent) -> Delivery {
    if is_task_output(&event) && queue.queued_lines.fetch_add(1, Ordering::AcqRel) >= line_cap {
        queue.queued_lines.fetch_sub(1, Ordering::AcqRel);
        warn!(observer = %id, "Observer has too many unread task lines, dropping line");
        return Delivery::Dropped;
    }
    match queue.tx.send(event) {
        Ok(()) => Delivery::Sent,
        Err(_) => {
            debug!(observer = %id, "Observer channel closed");
            Delivery::Closed
        }
    }
}

/// Registry of connected observers.
pub struct ObserverHub {
    observers: RwLock<HashMap<ObserverId, ObserverQueue>>,
    line_cap: usize,
}

impl ObserverHub {
    /// Create a hub that queues at most `line_cap` unread task lines per
    /// observer.
    pub fn new(line_cap: usize) -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            line_cap: line_cap.max(1),
        }
    }

    /// Register a new observer and return its id and event stream.
    pub fn register(&self) -> (ObserverId, ObserverEvents) {
        let id = ObserverId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let queued_lines = Arc::new(AtomicUsize::new(0));
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                ObserverQueue {
                    tx,
                    queued_lines: Arc::clone(&queued_lines),
                },
            );
        debug!(observer = %id, "Observer registered");
        (id, ObserverEvents { rx, queued_lines })
    }

    /// Forget an observer. Returns whether it was registered.
    pub fn deregister(&self, id: ObserverId) -> bool {
        let removed = self
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            debug!(observer = %id, "Observer deregistered");
        }
        removed
    }

    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn prune(&self, closed: &[ObserverId]) {
        if closed.is_empty() {
            return;
        }
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        for id in closed {
            observers.remove(id);
        }
    }
}

impl Default for ObserverHub {
    fn default() -> Self {
        Self::new(tpanel_core::DEFAULT_EVENT_BUFFER)
    }
}

impl EventBroadcaster for ObserverHub {
    fn emit(&self, event: PanelEvent, target: EventTarget) {
        let closed: Vec<ObserverId> = {
            let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
            match target {
                EventTarget::All => observers
                    .iter()
                    .filter(|(id, queue)| {
                        matches!(
                            deliver(**id, queue, self.line_cap, event.clone()),
                            Delivery::Closed
                        )
                    })
                    .map(|(id, _)| *id)
                    .collect(),
                EventTarget::Observer(id) => match observers.get(&id) {
                    Some(queue) => match deliver(id, queue, self.line_cap, event) {
                        Delivery::Closed => vec![id],
                        Delivery::Sent | Delivery::Dropped => Vec::new(),
                    },
                    None => {
                        debug!(observer = %id, event = event.event_name(), "Observer gone, event skipped");
                        Vec::new()
                    }
                },
            }
        };
        self.prune(&closed);
    }
}
