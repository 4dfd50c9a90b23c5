use parking_lot::Mutex;

use crate::event::{AppEvent, EventHandler};

/// A simple event bus for broadcasting app events to registered handlers
pub struct EventBus {
    handlers: Mutex<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.lock().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.lock().push(handler);
    }

    /// Emit an event to all registered handlers, in subscription order.
    ///
    /// The lock is not held while handlers run, so a handler may subscribe or
    /// emit again. Handlers added during an emit start with the next event; a
    /// nested emit only reaches those.
    pub fn emit(&self, event: AppEvent) {
        let mut running = std::mem::take(&mut *self.handlers.lock());
        for handler in running.iter_mut() {
            handler.handle_event(&event);
        }

        let mut handlers = self.handlers.lock();
        let added = std::mem::replace(&mut *handlers, running);
        handlers.extend(added);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }
}
