//! Frequency-domain companion view fed with raw frames.
//!
//! [`SpectrumView`] keeps its own short history per enabled channel,
//! independent of the dispatcher's throttle and pause state, so the spectrum
//! sees every line the transport delivered.

use super::fft::{FftAnalyzer, Spectrum, WindowFunction};
use crate::config::SpectralConfig;
use crate::pipeline::parser::{parse_line, split_frame};
use crate::pipeline::registry::ChannelRegistry;
use crate::pipeline::spectral::SpectralSink;
use crate::types::ChannelIndex;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct SpectrumState {
    registry: ChannelRegistry,
    history: Vec<VecDeque<f64>>,
    history_len: usize,
    sample_rate_hz: f64,
    max_freq_hz: f64,
    analyzer: FftAnalyzer,
    frames_seen: u64,
}

/// Shared handle to the spectral history.
///
/// Clones share state: one clone is handed to the dispatcher as its
/// [`SpectralSink`], another stays with the UI for drawing.
#[derive(Clone)]
pub struct SpectrumView {
    state: Rc<RefCell<SpectrumState>>,
}

impl SpectrumView {
    pub fn new(registry: ChannelRegistry, config: &SpectralConfig) -> Self {
        let history = vec![VecDeque::new(); registry.len()];
        Self {
            state: Rc::new(RefCell::new(SpectrumState {
                registry,
                history,
                history_len: config.history_len.max(2),
                sample_rate_hz: config.sample_rate_hz,
                max_freq_hz: config.max_freq_hz,
                analyzer: FftAnalyzer::new(WindowFunction::Hann),
                frames_seen: 0,
            })),
        }
    }

    pub fn frames_seen(&self) -> u64 {
        self.state.borrow().frames_seen
    }

    /// Ceiling most recently passed along with a frame.
    pub fn max_freq_hz(&self) -> f64 {
        self.state.borrow().max_freq_hz
    }

    pub fn history_len(&self, index: ChannelIndex) -> usize {
        self.state
            .borrow()
            .history
            .get(index)
            .map_or(0, VecDeque::len)
    }

    /// Spectrum of one enabled channel, `None` for disabled or unknown ones.
    pub fn spectrum(&self, index: ChannelIndex) -> Option<Spectrum> {
        let mut state = self.state.borrow_mut();
        if !state.registry.is_enabled(index) {
            return None;
        }
        let samples: Vec<f64> = state.history.get(index)?.iter().copied().collect();
        let rate = state.sample_rate_hz;
        let ceiling = state.max_freq_hz;
        Some(state.analyzer.compute(&samples, rate, ceiling))
    }

    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.history.iter_mut().for_each(VecDeque::clear);
    }
}

impl SpectralSink for SpectrumView {
    fn on_frame(&mut self, frame: &str, max_freq_hz: f64) {
        let mut state = self.state.borrow_mut();
        state.frames_seen += 1;
        state.max_freq_hz = max_freq_hz;

        let cap = state.history_len;
        let enabled: Vec<ChannelIndex> = state.registry.enabled_indices().collect();
        for parsed in split_frame(frame).filter_map(parse_line) {
            for &index in &enabled {
                let Some(value) = parsed.value(index) else {
                    continue;
                };
                let history = &mut state.history[index];
                if history.len() == cap {
                    history.pop_front();
                }
                history.push_back(value);
            }
        }
    }
}

impl std::fmt::Debug for SpectrumView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SpectrumView")
            .field("channels", &state.registry.len())
            .field("frames_seen", &state.frames_seen)
            .field("max_freq_hz", &state.max_freq_hz)
            .finish()
    }
}
