//! Feed dispatcher: raw frames in, per-channel samples out.
//!
//! ```text
//! frame ──► split lines ──► Throttle ──► parse ──► pause gate ──► WindowBuffer
//!   │                                                                └─► RenderTarget
//!   └──► SpectralSink (unmodified)
//! ```
//!
//! Everything runs on the caller's thread. The host loop must call
//! [`FeedDispatcher::tick`] regularly so that a line parked in the throttle
//! is delivered once its window elapses; [`FeedDispatcher::next_deadline`]
//! says when that will be.

use crate::pipeline::appearance::{AppearanceAdapter, AppearanceProfile, Theme};
use crate::pipeline::clock::{Clock, SystemClock};
use crate::pipeline::parser::{is_blank, parse_line, split_frame};
use crate::pipeline::pause::PauseController;
use crate::pipeline::registry::ChannelRegistry;
use crate::pipeline::spectral::{SpectralSink, DEFAULT_MAX_FREQ_HZ};
use crate::pipeline::surface::{RenderTarget, SurfaceId, SurfaceRegistry};
use crate::pipeline::throttle::{Throttle, DEFAULT_THROTTLE_MS};
use crate::pipeline::window::{WindowBuffer, DEFAULT_MAX_POINTS, DEFAULT_RETENTION_MS};
use crate::types::{Channel, ChannelIndex, DispatchStats, Sample};
use std::sync::Arc;
use std::time::Duration;

/// Tunables for a [`FeedDispatcher`].
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherOptions {
    pub throttle: Duration,
    pub retention: Duration,
    pub max_points: usize,
    pub theme: Theme,
    pub max_freq_hz: f64,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            retention: Duration::from_millis(DEFAULT_RETENTION_MS),
            max_points: DEFAULT_MAX_POINTS,
            theme: Theme::default(),
            max_freq_hz: DEFAULT_MAX_FREQ_HZ,
        }
    }
}

/// One enabled channel: its window and (if resolved) its render target.
pub struct ChannelView {
    index: ChannelIndex,
    surface_id: SurfaceId,
    window: WindowBuffer,
    surface: Option<Box<dyn RenderTarget>>,
}

impl ChannelView {
    pub fn index(&self) -> ChannelIndex {
        self.index
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    /// Whether a render target was found for this channel at startup.
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }
}

impl std::fmt::Debug for ChannelView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelView")
            .field("index", &self.index)
            .field("surface_id", &self.surface_id)
            .field("samples", &self.window.len())
            .field("bound", &self.surface.is_some())
            .finish()
    }
}

pub struct FeedDispatcher {
    registry: ChannelRegistry,
    pause: PauseController,
    channels: Vec<ChannelView>,
    throttle: Throttle<String>,
    appearance: AppearanceAdapter,
    clock: Box<dyn Clock>,
    spectral: Option<Box<dyn SpectralSink>>,
    max_freq_hz: f64,
    stats: DispatchStats,
}

impl FeedDispatcher {
    /// Build the pipeline: one window per enabled channel, each bound to the
    /// surface `surfaces` resolves for it. Unresolved surfaces are logged
    /// here and the channel stays inert.
    pub fn new(
        registry: ChannelRegistry,
        options: DispatcherOptions,
        surfaces: &mut dyn SurfaceRegistry,
    ) -> Self {
        let appearance = AppearanceAdapter::new(options.theme);
        let profile = appearance.profile();

        let channels: Vec<ChannelView> = registry
            .enabled_indices()
            .map(|index| {
                let surface_id = SurfaceId::for_channel(index);
                let mut surface = surfaces.resolve(&surface_id);
                match surface.as_mut() {
                    Some(target) => {
                        target.apply_appearance(&profile);
                        target.start();
                    }
                    None => tracing::warn!(
                        "No render surface '{}' for channel {}; its samples will be ignored",
                        surface_id,
                        index
                    ),
                }
                ChannelView {
                    index,
                    surface_id,
                    window: WindowBuffer::new(options.retention, options.max_points),
                    surface,
                }
            })
            .collect();

        tracing::info!(
            "Feed dispatcher ready: {} of {} channels enabled, {} bound, throttle {:?}",
            channels.len(),
            registry.len(),
            channels.iter().filter(|c| c.is_bound()).count(),
            options.throttle
        );

        Self {
            pause: PauseController::new(registry.len()),
            registry,
            channels,
            throttle: Throttle::new(options.throttle),
            appearance,
            clock: Box::new(SystemClock),
            spectral: None,
            max_freq_hz: options.max_freq_hz,
            stats: DispatchStats::default(),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Attach the companion spectral view.
    pub fn with_spectral_sink(mut self, sink: impl SpectralSink + 'static) -> Self {
        self.spectral = Some(Box::new(sink));
        self
    }

    /// Consume one raw frame.
    ///
    /// The frame goes to the spectral sink untouched. Its non-blank lines are
    /// offered to the throttle in order; a line the throttle lets through is
    /// parsed and routed immediately, the rest wait in (or are superseded in)
    /// the pending slot.
    pub fn ingest_frame(&mut self, frame: &str) {
        self.stats.frames_received += 1;

        if let Some(sink) = self.spectral.as_mut() {
            sink.on_frame(frame, self.max_freq_hz);
        }

        let now = self.clock.now_ms();
        if let Some(line) = self.throttle.poll(now) {
            self.route(&line, now);
        }

        for line in split_frame(frame) {
            if is_blank(line) {
                continue;
            }
            self.stats.lines_received += 1;
            if let Some(line) = self.throttle.call(line.to_owned(), now) {
                self.route(&line, now);
            }
        }
    }

    /// Deliver the pending line if its throttle window has elapsed.
    /// Returns whether a line was dispatched.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        match self.throttle.poll(now) {
            Some(line) => {
                self.route(&line, now);
                true
            }
            None => false,
        }
    }

    /// Parse and route one line right away, bypassing the throttle.
    pub fn dispatch_line(&mut self, line: &str) {
        let now = self.clock.now_ms();
        self.route(line, now);
    }

    /// Epoch milliseconds at which a pending line becomes due.
    pub fn next_deadline(&self) -> Option<i64> {
        self.throttle.deadline()
    }

    fn route(&mut self, line: &str, now_ms: i64) {
        let Some(parsed) = parse_line(line) else {
            return;
        };
        self.stats.lines_dispatched += 1;

        for view in &mut self.channels {
            let Some(surface) = view.surface.as_mut() else {
                continue;
            };
            let value = parsed.value(view.index);

            if self.pause.is_paused(view.index) {
                if value.is_some() {
                    self.stats.samples_paused += 1;
                }
                continue;
            }

            match value {
                Some(value) => {
                    let sample = Sample::new(now_ms, value);
                    view.window.push(sample);
                    surface.on_sample(&sample);
                    self.stats.samples_appended += 1;
                }
                None => {
                    self.stats.invalid_fields += 1;
                    tracing::trace!("No sample for channel {} in line {:?}", view.index, line);
                }
            }
        }
    }

    /// Flip a channel between paused and running.
    ///
    /// The bound render target is stopped or restarted to match. Buffered
    /// samples are kept; nothing missed while paused is replayed. Returns the
    /// new paused state, or `None` for an index that is not configured.
    pub fn toggle_pause(&mut self, index: ChannelIndex) -> Option<bool> {
        let paused = self.pause.toggle(index)?;

        if let Some(surface) = self
            .channels
            .iter_mut()
            .find(|c| c.index == index)
            .and_then(|c| c.surface.as_mut())
        {
            if paused {
                surface.stop();
            } else {
                surface.start();
            }
        }

        tracing::debug!(
            "Channel {} {}",
            index,
            if paused { "paused" } else { "resumed" }
        );
        Some(paused)
    }

    pub fn is_paused(&self, index: ChannelIndex) -> bool {
        self.pause.is_paused(index)
    }

    /// Apply a theme to every bound surface. Buffers are not touched.
    pub fn set_theme(&mut self, theme: Theme) {
        let changed = self.appearance.set_theme(theme);
        let profile = self.appearance.profile();
        for surface in self.channels.iter_mut().filter_map(|c| c.surface.as_mut()) {
            surface.apply_appearance(&profile);
        }
        if changed {
            tracing::info!("Theme changed to {}", theme);
        }
    }

    pub fn theme(&self) -> Theme {
        self.appearance.theme()
    }

    pub fn appearance(&self) -> Arc<AppearanceProfile> {
        self.appearance.profile()
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Enabled channels in index order.
    pub fn channels(&self) -> &[ChannelView] {
        &self.channels
    }

    pub fn channel(&self, index: ChannelIndex) -> Option<&ChannelView> {
        self.channels.iter().find(|c| c.index == index)
    }

    /// Snapshot of every configured channel, enabled or not.
    pub fn channel_states(&self) -> Vec<Channel> {
        (0..self.registry.len())
            .map(|index| Channel {
                index,
                enabled: self.registry.is_enabled(index),
                paused: self.pause.is_paused(index),
            })
            .collect()
    }

    pub fn max_freq_hz(&self) -> f64 {
        self.max_freq_hz
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            lines_coalesced: self.throttle.coalesced(),
            ..self.stats
        }
    }
}

impl std::fmt::Debug for FeedDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedDispatcher")
            .field("registry", &self.registry)
            .field("pause", &self.pause)
            .field("channels", &self.channels)
            .field("theme", &self.appearance.theme())
            .field("stats", &self.stats())
            .finish()
    }
}
