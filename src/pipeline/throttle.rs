//! Coalescing rate limiter.
//!
//! [`Throttle`] lets at most one value through per interval. The first call
//! of an idle window fires immediately (leading edge); later calls inside the
//! window overwrite a single pending slot, which [`Throttle::poll`] releases
//! once the window has elapsed (trailing edge). Only the most recent value is
//! ever delivered on the trailing edge; superseded values are counted and
//! discarded.
//!
//! There is no timer thread. The owner calls `poll` from its event loop and
//! may use [`Throttle::deadline`] to decide when to wake up next.

use std::time::Duration;

/// Default throttle interval for line dispatch.
pub const DEFAULT_THROTTLE_MS: u64 = 100;

#[derive(Debug)]
pub struct Throttle<T> {
    interval_ms: i64,
    leading: bool,
    trailing: bool,
    /// Start of the current window (time of the last delivery, or of the
    /// first deferred call when the leading edge is disabled).
    window_start: Option<i64>,
    pending: Option<T>,
    coalesced: u64,
}

impl<T> Throttle<T> {
    /// Leading + trailing throttle with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis().min(i64::MAX as u128) as i64,
            leading: true,
            trailing: true,
            window_start: None,
            pending: None,
            coalesced: 0,
        }
    }

    /// Enable or disable either edge.
    pub fn with_edges(mut self, leading: bool, trailing: bool) -> Self {
        self.leading = leading;
        self.trailing = trailing;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }

    /// Submit a value at `now_ms`.
    ///
    /// Returns the value back if it should be delivered right now. Otherwise
    /// it is parked in the pending slot (or dropped if the trailing edge is
    /// disabled) and `None` is returned.
    pub fn call(&mut self, value: T, now_ms: i64) -> Option<T> {
        if self.pending.is_none() && self.window_elapsed(now_ms) {
            self.window_start = Some(now_ms);
            if self.leading {
                return Some(value);
            }
        }

        if self.trailing {
            if self.pending.replace(value).is_some() {
                self.coalesced += 1;
            }
        } else {
            self.coalesced += 1;
        }
        None
    }

    /// Release the pending value if its window has elapsed.
    pub fn poll(&mut self, now_ms: i64) -> Option<T> {
        if self.pending.is_some() && self.window_elapsed(now_ms) {
            self.window_start = Some(now_ms);
            return self.pending.take();
        }
        None
    }

    /// Release the pending value immediately, starting a new window.
    pub fn flush(&mut self, now_ms: i64) -> Option<T> {
        let value = self.pending.take()?;
        self.window_start = Some(now_ms);
        Some(value)
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// When the pending value becomes deliverable, if there is one.
    pub fn deadline(&self) -> Option<i64> {
        self.pending.as_ref()?;
        Some(
            self.window_start
                .map_or(i64::MIN, |start| start.saturating_add(self.interval_ms)),
        )
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Total number of values that were superseded or dropped.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    #[inline]
    fn window_elapsed(&self, now_ms: i64) -> bool {
        match self.window_start {
            None => true,
            // A clock that stepped backwards restarts the window.
            Some(start) => now_ms < start || now_ms - start >= self.interval_ms,
        }
    }
}
