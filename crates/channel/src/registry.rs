//! Per-event listener bookkeeping.
//!
//! Each event name has at most one active listener. Binding a new listener
//! for a name retires the previous one, so a stale handler from an earlier,
//! possibly-still-pending operation can never observe a later operation's
//! response.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::warn;

use filedock_protocol::constants::EventName;
use filedock_protocol::envelope::Event;

/// Mapping from event name to the currently active listener for that name.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<EventName, mpsc::UnboundedSender<Event>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a listener for `event`, superseding any existing one.
    ///
    /// The previous listener's sender is dropped, which ends its stream.
    pub fn bind(&mut self, event: EventName) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.insert(event, tx);
        rx
    }

    /// Releases the listener for `event`, if any.
    pub fn release(&mut self, event: EventName) {
        self.listeners.remove(&event);
    }

    /// Releases every listener. Used on channel teardown.
    pub fn release_all(&mut self) {
        self.listeners.clear();
    }

    /// Routes `event` to its current listener.
    ///
    /// Returns `false` if no listener is bound or the listener's receiver is
    /// gone; a dead binding is pruned.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let name = event.event;
        match self.listeners.get(&name) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    self.listeners.remove(&name);
                    warn!(%name, "listener receiver dropped, pruning binding");
                    return false;
                }
                true
            }
            None => false,
        }
    }
}
