//! Event broadcaster trait for pushing events to observers.
//!
//! Implementations handle transport details (channels, sockets). Core logic
//! never learns whether a delivery succeeded.

use crate::events::{EventTarget, PanelEvent};

/// Trait for emitting events to connected observers.
///
/// # Implementations
///
/// - `NoopBroadcaster` - For tests and contexts without observers
/// - `ObserverHub` in the runtime crate - per-observer channels
pub trait EventBroadcaster: Send + Sync {
    /// Deliver `event` to `target`.
    ///
    /// Must not block and must not fail: an unreachable observer is logged
    /// and skipped. Events sent to the same observer arrive in call order.
    fn emit(&self, event: PanelEvent, target: EventTarget);
}

/// A broadcaster that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBroadcaster;

impl EventBroadcaster for NoopBroadcaster {
    fn emit(&self, _event: PanelEvent, _target: EventTarget) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;
    use std::sync::Arc;

    #[test]
    fn test_noop_broadcaster_behind_arc() {
        let broadcaster: Arc<dyn EventBroadcaster> = Arc::new(NoopBroadcaster);
        broadcaster.emit(PanelEvent::log(LogLevel::Info, "dropped"), EventTarget::All);
    }
}
