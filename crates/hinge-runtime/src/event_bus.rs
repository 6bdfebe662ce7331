//! Event bus for broadcasting game events

use crate::event::GameEvent;

/// A simple event queue that systems push to and consumers drain
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all events from the bus, returning them in push order
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events, oldest first
    pub fn pending(&self) -> &[GameEvent] {
        &self.events
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
