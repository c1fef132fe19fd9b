//! Test data builders for creating test objects

use super::mock_helpers::RecordingTarget;
use std::collections::HashMap;
use std::time::Duration;
use streamscope::pipeline::{
    ChannelRegistry, DispatcherOptions, FeedDispatcher, ManualClock, RenderTarget, SurfaceId,
    Theme,
};
use streamscope::ChannelIndex;

/// Start of the manual clock in built dispatchers
pub const T0: i64 = 1_700_000_000_000;

/// A dispatcher wired to recording targets and a manual clock
pub struct TestPipeline {
    pub dispatcher: FeedDispatcher,
    pub clock: ManualClock,
    pub targets: HashMap<ChannelIndex, RecordingTarget>,
}

impl TestPipeline {
    pub fn target(&self, index: ChannelIndex) -> &RecordingTarget {
        &self.targets[&index]
    }

    /// Number of buffered samples for a channel, 0 if it has no buffer
    pub fn buffered(&self, index: ChannelIndex) -> usize {
        self.dispatcher
            .channel(index)
            .map_or(0, |c| c.window().len())
    }

    pub fn latest(&self, index: ChannelIndex) -> Option<f64> {
        self.dispatcher
            .channel(index)
            .and_then(|c| c.window().latest())
            .map(|s| s.value)
    }
}

/// Builder for creating test dispatchers
pub struct DispatcherBuilder {
    channels: Vec<bool>,
    throttle: Duration,
    theme: Theme,
    unbound: Vec<ChannelIndex>,
}

impl DispatcherBuilder {
    pub fn new(channels: &[bool]) -> Self {
        Self {
            channels: channels.to_vec(),
            throttle: Duration::from_millis(100),
            theme: Theme::Dark,
            unbound: Vec::new(),
        }
    }

    pub fn throttle_ms(mut self, ms: u64) -> Self {
        self.throttle = Duration::from_millis(ms);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Leave this channel without a render surface
    pub fn without_surface(mut self, index: ChannelIndex) -> Self {
        self.unbound.push(index);
        self
    }

    pub fn build(self) -> TestPipeline {
        let registry = ChannelRegistry::new(self.channels.clone());
        let mut targets = HashMap::new();
        let mut surfaces: HashMap<SurfaceId, Box<dyn RenderTarget>> = HashMap::new();
        for index in registry.enabled_indices() {
            if self.unbound.contains(&index) {
                continue;
            }
            let target = RecordingTarget::new();
            surfaces.insert(SurfaceId::for_channel(index), Box::new(target.clone()));
            targets.insert(index, target);
        }

        let options = DispatcherOptions {
            throttle: self.throttle,
            theme: self.theme,
            ..Default::default()
        };
        let clock = ManualClock::new(T0);
        let dispatcher =
            FeedDispatcher::new(registry, options, &mut surfaces).with_clock(clock.clone());

        TestPipeline {
            dispatcher,
            clock,
            targets,
        }
    }
}
