//! In-process schedulers.
//!
//! Both schedulers keep a table of repeating timers; the owner polls
//! [`due_timers`](ManualScheduler::due_timers) and dispatches each handle
//! to the controller. `ManualScheduler` only moves when told to, which
//! makes scripted sessions and tests deterministic.

use std::time::{Duration, Instant};

use super::{Scheduler, TimerHandle};

#[derive(Debug, Clone)]
struct TimerEntry {
    handle: TimerHandle,
    interval: Duration,
    next_due: Instant,
}

/// Repeating timers keyed by handle.
#[derive(Debug, Default)]
struct TimerTable {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl TimerTable {
    fn start(&mut self, now: Instant, interval: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let interval = interval.max(Duration::from_millis(1));
        self.entries.push(TimerEntry {
            handle,
            interval,
            next_due: now + interval,
        });
        handle
    }

    fn stop(&mut self, handle: TimerHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    /// Handles due at `now`, each reported once and rescheduled past `now`.
    fn due(&mut self, now: Instant) -> Vec<TimerHandle> {
        let mut due = Vec::new();
        for entry in &mut self.entries {
            if entry.next_due <= now {
                due.push(entry.handle);
                while entry.next_due <= now {
                    entry.next_due += entry.interval;
                }
            }
        }
        due
    }

    fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.next_due).min()
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }
}

/// Scheduler whose clock only advances explicitly.
#[derive(Debug)]
pub struct ManualScheduler {
    origin: Instant,
    elapsed: Duration,
    timers: TimerTable,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            timers: TimerTable::default(),
        }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Time elapsed since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Timers due at the current time.
    pub fn due_timers(&mut self) -> Vec<TimerHandle> {
        let now = self.now();
        self.timers.due(now)
    }

    /// Time remaining until the earliest timer fires.
    pub fn until_next_due(&self) -> Option<Duration> {
        let now = self.now();
        self.timers
            .next_due()
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.is_active(handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.entries.len()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    fn start_repeating(&mut self, interval: Duration) -> TimerHandle {
        let now = self.now();
        self.timers.start(now, interval)
    }

    fn stop(&mut self, handle: TimerHandle) {
        self.timers.stop(handle);
    }
}

/// Scheduler backed by the system monotonic clock.
#[derive(Debug, Default)]
pub struct RealtimeScheduler {
    timers: TimerTable,
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn due_timers(&mut self) -> Vec<TimerHandle> {
        self.timers.due(Instant::now())
    }

    pub fn until_next_due(&self) -> Option<Duration> {
        let now = Instant::now();
        self.timers
            .next_due()
            .map(|due| due.saturating_duration_since(now))
    }
}

impl Scheduler for RealtimeScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn start_repeating(&mut self, interval: Duration) -> TimerHandle {
        self.timers.start(Instant::now(), interval)
    }

    fn stop(&mut self, handle: TimerHandle) {
        self.timers.stop(handle);
    }
}
