//! Cooperative single-threaded event loop
//!
//! Models the editor's UI thread: work is either queued for the next frame or
//! parked on a timer. Time is virtual and only moves when frames are run, so
//! deferred behavior is fully deterministic.

use std::collections::BTreeMap;
use std::time::Duration;

use super::Editor;

/// Deferred unit of work, run with full access to the editor
pub type Task = Box<dyn FnOnce(&mut Editor)>;

pub struct EventLoop {
    now: Duration,
    frame_interval: Duration,
    frame: u64,
    next_frame: Vec<Task>,
    /// Keyed by (deadline, sequence) so equal deadlines fire in scheduling order
    timers: BTreeMap<(Duration, u64), Task>,
    sequence: u64,
}

impl EventLoop {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval: Duration::from_millis(frame_interval_ms.max(1)),
            frame: 0,
            next_frame: Vec::new(),
            timers: BTreeMap::new(),
            sequence: 0,
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run `task` at the start of the next frame
    pub fn request_animation_frame(&mut self, task: Task) {
        self.next_frame.push(task);
    }

    /// Run `task` once `delay` has elapsed
    pub fn set_timeout(&mut self, delay: Duration, task: Task) {
        let key = (self.now + delay, self.sequence);
        self.sequence += 1;
        self.timers.insert(key, task);
    }

    pub fn pending(&self) -> usize {
        self.next_frame.len() + self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Advance the clock by one frame and hand out the tasks queued for it
    pub(crate) fn begin_frame(&mut self) -> Vec<Task> {
        self.frame += 1;
        self.now += self.frame_interval;
        std::mem::take(&mut self.next_frame)
    }

    /// Next timer whose deadline has passed
    pub(crate) fn pop_due_timer(&mut self) -> Option<Task> {
        let key = *self.timers.keys().next()?;
        if key.0 > self.now {
            return None;
        }
        self.timers.remove(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Task {
        Box::new(|_editor: &mut Editor| {})
    }

    #[test]
    fn test_frame_tasks_are_taken_once() {
        let mut events = EventLoop::new(16);
        events.request_animation_frame(noop());
        events.request_animation_frame(noop());
        assert_eq!(events.pending(), 2);

        assert_eq!(events.begin_frame().len(), 2);
        assert!(events.begin_frame().is_empty());
        assert_eq!(events.frame(), 2);
        assert_eq!(events.now(), Duration::from_millis(32));
    }

    #[test]
    fn test_timers_fire_after_deadline() {
        let mut events = EventLoop::new(16);
        events.set_timeout(Duration::from_millis(50), noop());

        for _ in 0..3 {
            events.begin_frame();
            assert!(events.pop_due_timer().is_none());
        }
        events.begin_frame();
        assert!(events.pop_due_timer().is_some());
        assert!(events.is_idle());
    }
}
