//! Job submission event registry
//!
//! Listeners are owned by a node and live only as long as it does: the editor
//! drops every listener of a node when the node is removed.

use log::debug;

use crate::nodes::NodeId;

/// Handle returned by [`SubmissionBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    owner: NodeId,
    listener: Box<dyn FnMut()>,
}

#[derive(Default)]
pub struct SubmissionBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    emitted: u64,
}

impl SubmissionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, owner: NodeId, listener: Box<dyn FnMut()>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, owner, listener });
        id
    }

    /// Returns false when the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        before != self.subscriptions.len()
    }

    /// Drop every listener owned by `owner`, returning how many were removed
    pub fn unsubscribe_owner(&mut self, owner: NodeId) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.owner != owner);
        before - self.subscriptions.len()
    }

    /// Deliver one submission event to every listener, in subscription order
    pub fn emit(&mut self) {
        self.emitted += 1;
        debug!("Submission event #{} to {} listeners", self.emitted, self.subscriptions.len());
        for sub in self.subscriptions.iter_mut() {
            (sub.listener)();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn listeners_for(&self, owner: NodeId) -> usize {
        self.subscriptions.iter().filter(|sub| sub.owner == owner).count()
    }

    /// Number of events delivered so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
