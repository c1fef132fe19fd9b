//! Channel registry: which positional fields of a record are displayed.
//!
//! Fixed for the lifetime of a pipeline.

use crate::types::ChannelIndex;

/// Channel layout used when nothing else is configured: six fields, the
/// first four displayed.
pub const DEFAULT_CHANNELS: [bool; 6] = [true, true, true, true, false, false];

/// Static set of configured channel indices and their enabled flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRegistry {
    enabled: Vec<bool>,
}

impl ChannelRegistry {
    pub fn new(enabled: impl Into<Vec<bool>>) -> Self {
        Self {
            enabled: enabled.into(),
        }
    }

    /// Number of configured channels (enabled or not).
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Whether `index` is configured and enabled. Unknown indices are disabled.
    pub fn is_enabled(&self, index: ChannelIndex) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    /// Enabled indices in ascending order.
    pub fn enabled_indices(&self) -> impl Iterator<Item = ChannelIndex> + '_ {
        self.enabled
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|&&on| on).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.enabled
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS.to_vec())
    }
}
