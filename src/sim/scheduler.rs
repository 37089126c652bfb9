//! Cancelable timers on a virtual clock
//!
//! One-shot and repeating timers share one handle type. The clock only moves
//! when the host pumps it, so everything stays deterministic: timers fire in
//! due-time order, ties in scheduling order, one at a time.

use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    handle: TimerHandle,
    due: Duration,
    /// `Some` for repeating timers
    period: Option<Duration>,
    payload: T,
}

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub at: Duration,
    pub payload: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    timers: Vec<Timer<T>>,
    next_handle: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            timers: Vec::new(),
            next_handle: 1,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock time
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, payload: T, delay: Duration, period: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            due: self.now + delay,
            period,
            payload,
        });
        handle
    }

    /// Fire `payload` once after `delay`, then forget it
    pub fn schedule_once(&mut self, payload: T, delay: Duration) -> TimerHandle {
        self.push(payload, delay, None)
    }

    /// Fire `payload` every `period` until canceled
    ///
    /// A zero period is bumped to 1ms so a pump always terminates.
    pub fn schedule_repeating(&mut self, payload: T, period: Duration) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        self.push(payload, period, Some(period))
    }

    /// Returns whether a live timer was removed
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        before != self.timers.len()
    }

    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to it
    ///
    /// When nothing is due the clock moves to `until` and `None` is returned.
    /// Repeating timers are re-armed one period after the time they fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now = self.now.max(until);
            return None;
        };

        let fired_at = self.timers[idx].due;
        self.now = self.now.max(fired_at);
        let fired = match self.timers[idx].period {
            Some(period) => {
                let timer = &mut self.timers[idx];
                timer.due = fired_at + period;
                Fired {
                    handle: timer.handle,
                    at: fired_at,
                    payload: timer.payload.clone(),
                }
            }
            None => {
                let timer = self.timers.swap_remove(idx);
                Fired {
                    handle: timer.handle,
                    at: fired_at,
                    payload: timer.payload,
                }
            }
        };
        Some(fired)
    }

    /// Move the clock forward by `elapsed`, collecting everything that fired
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Fired<T>> {
        let until = self.now + elapsed;
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(until) {
            fired.push(f);
        }
        fired
    }
}
