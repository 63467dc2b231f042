//! Per-node counters evaluated while jobs are captured

use std::cell::Cell;
use std::rc::Rc;

use crate::editor::submission::{SubmissionBus, SubscriptionId};
use crate::nodes::NodeId;

/// Counts captures since the last submission event
///
/// The count lives in a shared cell so the reset listener registered on the
/// [`SubmissionBus`] can zero it without access to the node.
#[derive(Debug, Default)]
pub struct SimpleCounter {
    count: Rc<Cell<u32>>,
    subscription: Option<SubscriptionId>,
}

impl SimpleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset on every submission event, for as long as `owner` exists
    pub fn subscribe(&mut self, bus: &mut SubmissionBus, owner: NodeId) {
        self.unsubscribe(bus);
        let count = Rc::clone(&self.count);
        self.subscription = Some(bus.subscribe(owner, Box::new(move || count.set(0))));
    }

    pub fn unsubscribe(&mut self, bus: &mut SubmissionBus) {
        if let Some(id) = self.subscription.take() {
            bus.unsubscribe(id);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Increment, then return the new count
    pub fn next(&self) -> u32 {
        let next = self.count.get().saturating_add(1);
        self.count.set(next);
        next
    }

    pub fn current(&self) -> u32 {
        self.count.get()
    }

    pub fn reset(&self) {
        self.count.set(0);
    }
}

/// Accumulating start value for "Continued" mode
///
/// The first capture hands out the stored start as is; every later one
/// increments it first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContinuedCounter {
    #[default]
    Idle,
    Armed,
}

impl ContinuedCounter {
    /// Start value for this capture
    pub fn next(&mut self, start: i64) -> i64 {
        match self {
            ContinuedCounter::Idle => {
                *self = ContinuedCounter::Armed;
                start
            }
            ContinuedCounter::Armed => start.saturating_add(1),
        }
    }

    pub fn reset(&mut self) {
        *self = ContinuedCounter::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_counter_resets_on_submission() {
        let mut bus = SubmissionBus::new();
        let mut counter = SimpleCounter::new();
        counter.subscribe(&mut bus, 7);

        assert_eq!((counter.next(), counter.next(), counter.next()), (1, 2, 3));
        bus.emit();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_resubscribe_replaces_listener() {
        let mut bus = SubmissionBus::new();
        let mut counter = SimpleCounter::new();
        counter.subscribe(&mut bus, 7);
        counter.subscribe(&mut bus, 7);
        assert_eq!(bus.listeners_for(7), 1);

        counter.unsubscribe(&mut bus);
        assert!(!counter.is_subscribed());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_continued_counter_accumulates() {
        let mut counter = ContinuedCounter::default();
        let mut start = 5;
        let mut seen = Vec::new();
        for _ in 0..3 {
            start = counter.next(start);
            seen.push(start);
        }
        assert_eq!(seen, vec![5, 6, 7]);

        counter.reset();
        assert_eq!(counter.next(start), 7);
    }

    #[test]
    fn test_continued_counter_stops_at_max() {
        let mut counter = ContinuedCounter::default();
        assert_eq!(counter.next(i64::MAX), i64::MAX);
        assert_eq!(counter.next(i64::MAX), i64::MAX);
    }
}
