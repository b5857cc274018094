//! Bounded audit log of query attempts and outcomes.
//!
//! A fixed-capacity ring buffer: when full, appending evicts the oldest
//! entry. Reads return the newest entries first.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::types::{AgentId, ExplorationEvent};

/// Default event capacity.
pub const EVENT_LOG_CAPACITY: usize = 1000;

/// Shared, append-mostly audit buffer.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<ExplorationEvent>>,
}

impl EventLog {
    /// Create a log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    /// Create a log holding at most `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Append an event, evicting the oldest when full.
    pub fn append(&self, event: ExplorationEvent) {
        let mut events = self.events.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// The most recent events, newest first.
    pub fn recent(&self, limit: usize) -> Vec<ExplorationEvent> {
        let events = self.events.lock();
        events.iter().rev().take(limit).cloned().collect()
    }

    /// The most recent events for one agent, newest first.
    pub fn for_agent(&self, agent_id: &AgentId, limit: usize) -> Vec<ExplorationEvent> {
        let events = self.events.lock();
        events
            .iter()
            .rev()
            .filter(|e| &e.agent_id == agent_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
