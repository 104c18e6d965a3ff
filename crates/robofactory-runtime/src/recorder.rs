//! Stock observers: an in-memory event recorder and a tracing bridge.

use robofactory_core::observer::{ModelEvent, ModelObserver};
use robofactory_core::types::{AgentId, Cell};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

/// Records every notification as a [`ModelEvent`].
///
/// Clones share one buffer, so a clone can be subscribed while the
/// original is kept for reading.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ModelEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ModelEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<ModelEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take the recorded events, leaving the buffer empty.
    pub fn drain(&self) -> Vec<ModelEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ModelObserver for EventRecorder {
    fn on_agent_updated(&mut self, location: Cell, agent: AgentId) {
        self.push(ModelEvent::AgentUpdated { location, agent });
    }

    fn on_agent_moved(&mut self, from: Cell, to: Cell, agent: AgentId) {
        self.push(ModelEvent::AgentMoved { from, to, agent });
    }

    fn on_cell_updated(&mut self, location: Cell) {
        self.push(ModelEvent::CellUpdated { location });
    }
}

/// Forwards notifications to `tracing` at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ModelObserver for TracingObserver {
    fn on_agent_updated(&mut self, location: Cell, agent: AgentId) {
        trace!(%agent, %location, "agent updated");
    }

    fn on_agent_moved(&mut self, from: Cell, to: Cell, agent: AgentId) {
        trace!(%agent, %from, %to, "agent moved");
    }

    fn on_cell_updated(&mut self, location: Cell) {
        trace!(%location, "cell updated");
    }
}
