//! Per-channel rolling window of samples.
//!
//! Samples are appended at the tail and evicted from the head once they fall
//! more than `retention` behind the newest sample. Eviction is driven by
//! appends only, so a channel that stops receiving samples (for example
//! while paused) keeps its history untouched.

use crate::types::Sample;
use std::collections::VecDeque;
use std::time::Duration;

/// Default retention horizon: one screen of chart at 12 ms per pixel.
pub const DEFAULT_RETENTION_MS: u64 = 12_000;

/// Hard cap on points per channel regardless of retention.
pub const DEFAULT_MAX_POINTS: usize = 50_000;

#[derive(Debug, Clone)]
pub struct WindowBuffer {
    samples: VecDeque<Sample>,
    retention_ms: i64,
    max_points: usize,
    evicted: u64,
}

impl WindowBuffer {
    pub fn new(retention: Duration, max_points: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_points.min(4096)),
            retention_ms: retention.as_millis().min(i64::MAX as u128) as i64,
            max_points: max_points.max(1),
            evicted: 0,
        }
    }

    /// Append a sample and evict everything older than the retention horizon.
    pub fn push(&mut self, sample: Sample) {
        if self.samples.len() >= self.max_points {
            self.samples.pop_front();
            self.evicted += 1;
        }
        self.samples.push_back(sample);
        self.evict_before(sample.timestamp_ms.saturating_sub(self.retention_ms));
    }

    /// Drop samples strictly older than `cutoff_ms`.
    pub fn evict_before(&mut self, cutoff_ms: i64) {
        while let Some(front) = self.samples.front() {
            if front.timestamp_ms < cutoff_ms {
                self.samples.pop_front();
                self.evicted += 1;
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms as u64)
    }

    /// Samples evicted so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Time range `(oldest, newest)` in milliseconds.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        Some((
            self.samples.front()?.timestamp_ms,
            self.samples.back()?.timestamp_ms,
        ))
    }

    /// Value range over samples at or after `since_ms`.
    pub fn value_range_since(&self, since_ms: i64) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .rev()
            .take_while(|s| s.timestamp_ms >= since_ms)
            .fold(None, |acc, s| match acc {
                None => Some((s.value, s.value)),
                Some((lo, hi)) => Some((f64::min(lo, s.value), f64::max(hi, s.value))),
            })
    }

    /// Points as `[seconds relative to origin, value]` for plotting.
    pub fn plot_points(&self, origin_ms: i64) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|s| [s.seconds_since(origin_ms), s.value])
            .collect()
    }
}

impl Default for WindowBuffer {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_RETENTION_MS),
            DEFAULT_MAX_POINTS,
        )
    }
}
