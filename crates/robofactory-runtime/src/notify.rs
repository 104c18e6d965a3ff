//! NotificationHub - fan-out of model changes to subscribed observers.
//!
//! Broadcasts run synchronously on the caller's thread, in subscription
//! order. The hub has no knowledge of what observers do with the events.

use robofactory_core::observer::ModelObserver;
use robofactory_core::types::{AgentId, Cell};
use serde::{Deserialize, Serialize};

/// Handle returned by [`NotificationHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

/// Registry of observers.
#[derive(Default)]
pub struct NotificationHub {
    observers: Vec<(SubscriptionId, Box<dyn ModelObserver>)>,
    next_id: u64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn ModelObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Drop a subscription. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn agent_updated(&mut self, location: Cell, agent: AgentId) {
        for (_, observer) in &mut self.observers {
            observer.on_agent_updated(location, agent);
        }
    }

    pub fn agent_moved(&mut self, from: Cell, to: Cell, agent: AgentId) {
        for (_, observer) in &mut self.observers {
            observer.on_agent_moved(from, to, agent);
        }
    }

    pub fn cell_updated(&mut self, location: Cell) {
        for (_, observer) in &mut self.observers {
            observer.on_cell_updated(location);
        }
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}
