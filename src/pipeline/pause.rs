//! Pause controller: one paused/running flag per configured channel.
//!
//! This is the only place pause state lives. Out-of-range indices are
//! ignored rather than reported.

use crate::types::ChannelIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseController {
    paused: Vec<bool>,
}

impl PauseController {
    /// All `channel_count` channels start running.
    pub fn new(channel_count: usize) -> Self {
        Self {
            paused: vec![false; channel_count],
        }
    }

    /// Flip the paused flag of `index`.
    ///
    /// Returns the new state (`true` = paused), or `None` if `index` is not a
    /// configured channel.
    pub fn toggle(&mut self, index: ChannelIndex) -> Option<bool> {
        let flag = self.paused.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Set the paused flag explicitly. Returns `Some(changed)`.
    pub fn set_paused(&mut self, index: ChannelIndex, paused: bool) -> Option<bool> {
        let flag = self.paused.get_mut(index)?;
        let changed = *flag != paused;
        *flag = paused;
        Some(changed)
    }

    /// Unknown indices report `false`.
    #[inline]
    pub fn is_paused(&self, index: ChannelIndex) -> bool {
        self.paused.get(index).copied().unwrap_or(false)
    }

    pub fn paused_count(&self) -> usize {
        self.paused.iter().filter(|&&p| p).count()
    }

    pub fn len(&self) -> usize {
        self.paused.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paused.is_empty()
    }
}
