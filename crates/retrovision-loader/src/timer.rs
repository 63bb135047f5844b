//! Monotonic clocks and the deferred-event timer queue.
//!
//! Timers carry a [`TimerEvent`] token instead of a closure; the owner
//! drains fired events with [`TimerService::pop_due`] from its own tick and
//! decides what each one means. This keeps every mutation on the owner's
//! `&mut self` and lets a whole group of timers be cancelled by handle.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Instant;

use crate::phase::Cue;

/// Milliseconds on a monotonic clock.
pub type Millis = u64;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Real time, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Virtual time advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute time. Moving backwards is ignored.
    pub fn set(&self, ms: Millis) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// Timer events and handles
// ---------------------------------------------------------------------------

/// Token delivered when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Preloading took too long; start the sequence anyway.
    PreloadDeadline,
    /// Apply a timeline cue.
    Cue(Cue),
}

impl TimerEvent {
    /// Ordering among timers sharing a deadline. Lower fires first:
    /// phase-changing cues precede flag-only ones.
    pub fn rank(&self) -> u8 {
        match self {
            TimerEvent::PreloadDeadline => 0,
            TimerEvent::Cue(cue) if cue.changes_phase() => 1,
            TimerEvent::Cue(_) => 2,
        }
    }
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer whose deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub deadline: Millis,
    pub event: TimerEvent,
}

// ---------------------------------------------------------------------------
// Timer service
// ---------------------------------------------------------------------------

/// Schedule-after-delay and cancel, against a monotonic clock.
pub trait TimerService {
    /// Current time on the service's clock.
    fn now(&self) -> Millis;

    /// Schedule `event` at an absolute deadline.
    fn schedule_at(&mut self, deadline: Millis, event: TimerEvent) -> TimerId;

    /// Schedule `event` `delay` milliseconds from now.
    fn schedule_after(&mut self, delay: Millis, event: TimerEvent) -> TimerId {
        let deadline = self.now().saturating_add(delay);
        self.schedule_at(deadline, event)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Remove and return the earliest timer whose deadline is at or before
    /// now, or `None` if nothing is due.
    fn pop_due(&mut self) -> Option<Fired>;

    /// Number of timers still pending.
    fn pending(&self) -> usize;
}

/// Ordered key: deadline, then rank, then scheduling order.
type QueueKey = (Millis, u8, u64);

/// [`TimerService`] backed by an ordered map.
#[derive(Debug)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    entries: BTreeMap<QueueKey, (TimerId, TimerEvent)>,
    keys: HashMap<TimerId, QueueKey>,
    next_seq: u64,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            entries: BTreeMap::new(),
            keys: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Deadline of the next pending timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.entries.keys().next().map(|&(deadline, _, _)| deadline)
    }
}

impl<C: Clock> TimerService for TimerQueue<C> {
    fn now(&self) -> Millis {
        self.clock.now()
    }

    fn schedule_at(&mut self, deadline: Millis, event: TimerEvent) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        let key = (deadline, event.rank(), seq);
        self.entries.insert(key, (id, event));
        self.keys.insert(id, key);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.keys.remove(&id) {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    fn pop_due(&mut self) -> Option<Fired> {
        let now = self.clock.now();
        let (&key, _) = self.entries.first_key_value()?;
        if key.0 > now {
            return None;
        }
        let (_, (id, event)) = self.entries.pop_first()?;
        self.keys.remove(&id);
        Some(Fired {
            id,
            deadline: key.0,
            event,
        })
    }

    fn pending(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Timer scope
// ---------------------------------------------------------------------------

/// The set of timers owned by one component.
///
/// Every handle the owner schedules is tracked here; [`cancel_all`]
/// releases whatever is still outstanding, on any exit path.
///
/// [`cancel_all`]: TimerScope::cancel_all
#[derive(Debug, Default)]
pub struct TimerScope {
    handles: Vec<TimerId>,
}

impl TimerScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule through `timers` and track the handle.
    pub fn schedule_at(
        &mut self,
        timers: &mut dyn TimerService,
        deadline: Millis,
        event: TimerEvent,
    ) -> TimerId {
        let id = timers.schedule_at(deadline, event);
        self.handles.push(id);
        id
    }

    /// Stop tracking a handle that fired. Returns `false` for handles this
    /// scope never owned.
    pub fn release(&mut self, id: TimerId) -> bool {
        match self.handles.iter().position(|&h| h == id) {
            Some(pos) => {
                self.handles.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Cancel a single tracked timer.
    pub fn cancel(&mut self, timers: &mut dyn TimerService, id: TimerId) -> bool {
        self.release(id) && timers.cancel(id)
    }

    /// Cancel every tracked timer. Returns how many were still pending.
    pub fn cancel_all(&mut self, timers: &mut dyn TimerService) -> usize {
        self.handles
            .drain(..)
            .filter(|&id| timers.cancel(id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
