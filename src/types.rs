//! Core data types for StreamScope
//!
//! # Main Types
//!
//! - [`Sample`] - A single `(timestamp, value)` point produced at ingestion
//! - [`Channel`] - Read-only snapshot of one configured channel
//! - [`DispatchStats`] - Counters maintained by the feed dispatcher
//!
//! Timestamps are wall-clock milliseconds taken when a line is dispatched,
//! never values embedded in the feed itself.

use serde::{Deserialize, Serialize};

/// Positional index of a channel within a record (0-based, after the
/// leading sequence column has been dropped).
pub type ChannelIndex = usize;

/// A single data point with timestamp and value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Wall-clock time of ingestion in milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// The parsed channel value
    pub value: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Timestamp relative to `origin_ms`, in seconds (for plotting)
    pub fn seconds_since(&self, origin_ms: i64) -> f64 {
        (self.timestamp_ms - origin_ms) as f64 / 1000.0
    }
}

/// Snapshot of a configured channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Index of the channel field
    pub index: ChannelIndex,
    /// Whether the channel is displayed (fixed at startup)
    pub enabled: bool,
    /// Whether appends to the channel's buffer are currently suspended
    pub paused: bool,
}

impl Channel {
    /// Short label shown next to the channel's controls (`Ch-1`, `Ch-2`, ...)
    pub fn label(&self) -> String {
        format!("Ch-{}", self.index + 1)
    }
}

/// Statistics about feed dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Raw frames handed to the dispatcher
    pub frames_received: u64,
    /// Non-blank lines seen across all frames
    pub lines_received: u64,
    /// Lines that made it through the rate limiter to parse-and-route
    pub lines_dispatched: u64,
    /// Lines superseded in the rate limiter's pending slot
    pub lines_coalesced: u64,
    /// Samples appended to window buffers
    pub samples_appended: u64,
    /// Valid values discarded because their channel was paused
    pub samples_paused: u64,
    /// Enabled-channel fields that were missing or not numeric
    pub invalid_fields: u64,
}

impl DispatchStats {
    /// Fraction of received lines that were dispatched, as a percentage
    pub fn dispatch_rate(&self) -> f64 {
        if self.lines_received == 0 {
            100.0
        } else {
            (self.lines_dispatched as f64 / self.lines_received as f64) * 100.0
        }
    }
}
