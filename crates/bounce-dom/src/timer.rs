//! Timer scheduling
//!
//! One-shot cancellable timers driven by an explicit pump, for deferred
//! work on the single-threaded event loop.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

struct TimerEntry {
    id: TimerId,
    deadline: Instant,
    callback: Box<dyn FnOnce()>,
}

/// One-shot timer manager
#[derive(Default)]
pub struct Scheduler {
    timers: RefCell<Vec<TimerEntry>>,
    next_id: Cell<u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a callback after `delay`
    pub fn set_timeout(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(self.next_id.get().wrapping_add(1));
        self.timers.borrow_mut().push(TimerEntry {
            id,
            deadline: Instant::now() + delay,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn clear(&self, id: TimerId) -> bool {
        let mut timers = self.timers.borrow_mut();
        let before = timers.len();
        timers.retain(|t| t.id != id);
        timers.len() != before
    }

    /// Run every due timer and return how many fired.
    ///
    /// Callbacks run outside the internal borrow, so they may schedule or
    /// cancel timers. Due timers run in scheduling order.
    pub fn pump(&self) -> usize {
        let now = Instant::now();
        let due: Vec<TimerEntry> = {
            let mut timers = self.timers.borrow_mut();
            let mut due = Vec::new();
            let mut rest = Vec::new();
            for timer in timers.drain(..) {
                if timer.deadline <= now {
                    due.push(timer);
                } else {
                    rest.push(timer);
                }
            }
            *timers = rest;
            due
        };

        let count = due.len();
        for timer in due {
            (timer.callback)();
        }
        count
    }

    /// Check if any timer is pending
    pub fn has_pending(&self) -> bool {
        !self.timers.borrow().is_empty()
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Time until the next timer fires
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = Instant::now();
        self.timers
            .borrow()
            .iter()
            .map(|t| t.deadline.saturating_duration_since(now))
            .min()
    }

    /// Sleep-and-pump until no timers remain
    pub fn run_until_idle(&self) {
        while let Some(wait) = self.time_until_next() {
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            self.pump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn zero_delay_is_due_immediately() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        scheduler.set_timeout(Duration::ZERO, move || f.set(true));
        assert!(scheduler.has_pending());
        assert_eq!(scheduler.pump(), 1);
        assert!(fired.get());
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn clear_prevents_callback() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let id = scheduler.set_timeout(Duration::ZERO, move || f.set(true));
        assert!(scheduler.clear(id));
        assert!(!scheduler.clear(id));
        assert_eq!(scheduler.pump(), 0);
        assert!(!fired.get());
    }

    #[test]
    fn future_timer_waits_for_deadline() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        scheduler.set_timeout(Duration::from_millis(40), move || f.set(true));
        assert_eq!(scheduler.pump(), 0);
        assert!(!fired.get());
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(scheduler.pump(), 1);
        assert!(fired.get());
    }

    #[test]
    fn due_timers_run_in_scheduling_order() {
        let scheduler = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let o = order.clone();
            scheduler.set_timeout(Duration::ZERO, move || o.borrow_mut().push(n));
        }
        scheduler.pump();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn callback_may_reschedule() {
        let scheduler = Rc::new(Scheduler::new());
        let fired = Rc::new(Cell::new(0));
        let s = scheduler.clone();
        let f = fired.clone();
        scheduler.set_timeout(Duration::ZERO, move || {
            f.set(f.get() + 1);
            let f2 = f.clone();
            s.set_timeout(Duration::ZERO, move || f2.set(f2.get() + 1));
        });
        scheduler.pump();
        assert_eq!(fired.get(), 1);
        assert!(scheduler.has_pending());
        scheduler.pump();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn run_until_idle_drains_everything() {
        let scheduler = Scheduler::new();
        let fired = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let f = fired.clone();
            scheduler.set_timeout(Duration::from_millis(5), move || f.set(f.get() + 1));
        }
        scheduler.run_until_idle();
        assert_eq!(fired.get(), 2);
        assert!(!scheduler.has_pending());
    }
}
