//! Chart surfaces handed to the dispatcher
//!
//! A [`PlotSurface`] is the dispatcher-facing half of a channel chart. It
//! records what the dispatcher tells it (running or stopped, colors, latest
//! sample); the chart widget reads that state back every frame.

use crate::pipeline::appearance::{AppearanceProfile, Theme};
use crate::pipeline::surface::{RenderTarget, SurfaceId};
use crate::types::{ChannelIndex, Sample};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
struct SurfaceState {
    running: bool,
    /// Right edge of the visible span; only advances while running
    right_edge_ms: Option<i64>,
    profile: AppearanceProfile,
    last_sample: Option<Sample>,
    samples_seen: u64,
    restyles: u64,
}

/// Shared chart state, one per channel
#[derive(Debug, Clone)]
pub struct PlotSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl Default for PlotSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotSurface {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SurfaceState {
                running: false,
                right_edge_ms: None,
                profile: AppearanceProfile::for_theme(Theme::default()),
                last_sample: None,
                samples_seen: 0,
                restyles: 0,
            })),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn profile(&self) -> AppearanceProfile {
        self.state.borrow().profile
    }

    pub fn last_sample(&self) -> Option<Sample> {
        self.state.borrow().last_sample
    }

    pub fn samples_seen(&self) -> u64 {
        self.state.borrow().samples_seen
    }

    /// Number of times an appearance was applied
    pub fn restyles(&self) -> u64 {
        self.state.borrow().restyles
    }

    /// Move the right edge to `edge_ms` if the chart is running and return
    /// the edge to draw at. A stopped chart keeps the edge it had.
    pub fn advance(&self, edge_ms: i64) -> i64 {
        let mut state = self.state.borrow_mut();
        if state.running || state.right_edge_ms.is_none() {
            state.right_edge_ms = Some(edge_ms);
        }
        state.right_edge_ms.unwrap_or(edge_ms)
    }
}

impl RenderTarget for PlotSurface {
    fn on_sample(&mut self, sample: &Sample) {
        let mut state = self.state.borrow_mut();
        state.last_sample = Some(*sample);
        state.samples_seen += 1;
    }

    fn stop(&mut self) {
        self.state.borrow_mut().running = false;
    }

    fn start(&mut self) {
        self.state.borrow_mut().running = true;
    }

    fn apply_appearance(&mut self, profile: &AppearanceProfile) {
        let mut state = self.state.borrow_mut();
        state.profile = *profile;
        state.restyles += 1;
    }
}

/// Create one surface per channel index and the registry the dispatcher
/// resolves them from.
pub fn build_surfaces(
    indices: impl IntoIterator<Item = ChannelIndex>,
) -> (
    Vec<(ChannelIndex, PlotSurface)>,
    HashMap<SurfaceId, Box<dyn RenderTarget>>,
) {
    let mut handles = Vec::new();
    let mut registry: HashMap<SurfaceId, Box<dyn RenderTarget>> = HashMap::new();
    for index in indices {
        let surface = PlotSurface::new();
        registry.insert(SurfaceId::for_channel(index), Box::new(surface.clone()));
        handles.push((index, surface));
    }
    (handles, registry)
}
