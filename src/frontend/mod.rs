//! Frontend module for egui UI
//!
//! The UI thread owns the [`FeedDispatcher`]. Every frame it drains the
//! backend's messages into the dispatcher, lets the throttle release a due
//! line, then draws one chart per enabled channel plus the optional
//! spectrum panel.
//!
//! # Main Types
//!
//! - [`StreamScopeApp`] - Application state implementing [`eframe::App`]
//! - [`PlotSurface`] - Render target bound to each channel chart
//!
//! # Submodules
//!
//! - `charts` - Channel strips drawn with egui_plot
//! - `spectrum_panel` - Frequency view
//! - `surface` - Dispatcher-facing chart state
//! - `toolbar` / `status_bar` - Top and bottom bars

pub mod charts;
pub mod spectrum_panel;
pub mod status_bar;
pub mod surface;
pub mod toolbar;

pub use surface::{build_surfaces, PlotSurface};
pub use toolbar::ToolbarAction;

use crate::analysis::SpectrumView;
use crate::backend::{FeedHandle, FeedMessage, FeedStats};
use crate::config::{AppConfig, UiPreferences};
use crate::pipeline::appearance::Theme;
use crate::pipeline::clock::{Clock, SystemClock};
use crate::pipeline::dispatcher::FeedDispatcher;
use crate::types::ChannelIndex;
use charts::ChartContext;
use status_bar::StatusBarContext;
use std::time::Duration;

/// Storage key for persisted UI preferences
const PREFERENCES_KEY: &str = "streamscope.preferences";

/// Repaint cadence while data is streaming
const LIVE_REPAINT: Duration = Duration::from_millis(16);

/// Main application state
pub struct StreamScopeApp {
    config: AppConfig,
    feed: FeedHandle,
    dispatcher: FeedDispatcher,
    surfaces: Vec<(ChannelIndex, PlotSurface)>,
    spectrum: SpectrumView,
    prefs: UiPreferences,
    show_spectrum: bool,
    clock: SystemClock,
    origin_ms: i64,
    feed_stats: FeedStats,
    feed_closed: bool,
    last_error: Option<String>,
}

impl StreamScopeApp {
    /// Create the app, restoring UI preferences from eframe storage.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, feed: FeedHandle) -> Self {
        let prefs = cc
            .storage
            .and_then(|s| eframe::get_value::<UiPreferences>(s, PREFERENCES_KEY))
            .unwrap_or(UiPreferences {
                theme: config.theme,
                scale: config.chart.scale,
            });

        apply_visuals(&cc.egui_ctx, prefs.theme);
        Self::with_preferences(config, feed, prefs)
    }

    /// Build the app without an egui context.
    pub fn with_preferences(config: AppConfig, feed: FeedHandle, prefs: UiPreferences) -> Self {
        let registry = config.registry();
        let (surfaces, mut surface_registry) = build_surfaces(registry.enabled_indices());
        let spectrum = SpectrumView::new(registry.clone(), &config.spectral);

        let mut options = config.dispatcher_options();
        options.theme = prefs.theme;
        let dispatcher = FeedDispatcher::new(registry, options, &mut surface_registry)
            .with_spectral_sink(spectrum.clone());

        let clock = SystemClock;
        let origin_ms = clock.now_ms();

        Self {
            config,
            feed,
            dispatcher,
            surfaces,
            spectrum,
            prefs,
            show_spectrum: false,
            clock,
            origin_ms,
            feed_stats: FeedStats::default(),
            feed_closed: false,
            last_error: None,
        }
    }

    pub fn dispatcher(&self) -> &FeedDispatcher {
        &self.dispatcher
    }

    pub fn preferences(&self) -> UiPreferences {
        self.prefs
    }

    pub fn surface(&self, index: ChannelIndex) -> Option<&PlotSurface> {
        self.surfaces
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, s)| s)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_feed_closed(&self) -> bool {
        self.feed_closed
    }

    /// Apply one backend message.
    pub fn handle_message(&mut self, msg: FeedMessage) {
        match msg {
            FeedMessage::Frame(frame) => self.dispatcher.ingest_frame(&frame),
            FeedMessage::Stats(stats) => self.feed_stats = stats,
            FeedMessage::Error(e) => {
                tracing::warn!("Feed error: {}", e);
                self.last_error = Some(e);
            }
            FeedMessage::Closed => {
                tracing::info!("Feed closed");
                self.feed_closed = true;
            }
        }
    }

    /// Drain the backend and release a due throttled line. Returns whether
    /// anything was processed.
    pub fn process_feed(&mut self) -> bool {
        let messages = self.feed.drain();
        let had_messages = !messages.is_empty();
        for msg in messages {
            self.handle_message(msg);
        }
        let ticked = self.dispatcher.tick();
        had_messages || ticked
    }

    pub fn handle_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::SetTheme(theme) => {
                self.prefs.theme = theme;
                self.dispatcher.set_theme(theme);
            }
            ToolbarAction::SetScale(scale) => self.prefs.scale = scale,
            ToolbarAction::ToggleSpectrum => self.show_spectrum = !self.show_spectrum,
            ToolbarAction::PauseAll => self.set_all_paused(true),
            ToolbarAction::ResumeAll => self.set_all_paused(false),
        }
    }

    fn set_all_paused(&mut self, paused: bool) {
        let indices: Vec<ChannelIndex> = self.dispatcher.registry().enabled_indices().collect();
        for index in indices {
            if self.dispatcher.is_paused(index) != paused {
                self.dispatcher.toggle_pause(index);
            }
        }
    }

    fn render_charts(&mut self, ui: &mut egui::Ui) {
        let now_ms = self.clock.now_ms();
        let count = self.dispatcher.channels().len().max(1) as f32;
        // header row plus spacing per strip
        let height = ((ui.available_height() / count) - 32.0).max(60.0);
        let ctx = ChartContext {
            settings: &self.config.chart,
            scale: self.prefs.scale,
            now_ms,
            origin_ms: self.origin_ms,
            height,
        };

        let mut toggles = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            let states = self.dispatcher.channel_states();
            for view in self.dispatcher.channels() {
                let Some(&channel) = states.iter().find(|c| c.index == view.index()) else {
                    continue;
                };
                let surface = self
                    .surfaces
                    .iter()
                    .find(|(i, _)| *i == view.index())
                    .map(|(_, s)| s);
                if charts::show_channel(ui, channel, view, surface, &ctx) {
                    toggles.push(view.index());
                }
                ui.add_space(4.0);
            }
        });

        for index in toggles {
            self.dispatcher.toggle_pause(index);
        }
    }
}

fn apply_visuals(ctx: &egui::Context, theme: Theme) {
    if theme.is_dark() {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

impl eframe::App for StreamScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_feed();

        if !self.feed_closed || had_messages {
            ctx.request_repaint_after(LIVE_REPAINT);
        } else if let Some(deadline) = self.dispatcher.next_deadline() {
            let wait = (deadline - self.clock.now_ms()).max(0) as u64;
            ctx.request_repaint_after(Duration::from_millis(wait));
        }

        let theme_before = self.prefs.theme;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            for action in toolbar::render_toolbar(ui, &self.prefs, self.show_spectrum) {
                self.handle_action(action);
            }
        });
        if self.prefs.theme != theme_before {
            apply_visuals(ctx, self.prefs.theme);
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let dispatch = self.dispatcher.stats();
            let source = self.config.feed.source.describe();
            status_bar::render_status_bar(
                ui,
                &StatusBarContext {
                    source: &source,
                    feed_running: self.feed.is_running() && !self.feed_closed,
                    feed: &self.feed_stats,
                    dispatch: &dispatch,
                    paused_channels: self
                        .dispatcher
                        .channel_states()
                        .iter()
                        .filter(|c| c.paused)
                        .count(),
                    last_error: self.last_error.as_deref(),
                },
            );
        });

        if self.show_spectrum {
            let profile = *self.dispatcher.appearance();
            let channels: Vec<ChannelIndex> =
                self.dispatcher.registry().enabled_indices().collect();
            egui::SidePanel::right("spectrum_panel")
                .default_width(360.0)
                .show(ctx, |ui| {
                    spectrum_panel::render(ui, &self.spectrum, &channels, &profile);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.render_charts(ui));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, PREFERENCES_KEY, &self.prefs);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.feed.stop();
        let stats = self.dispatcher.stats();
        tracing::info!(
            "Session ended: {} lines received, {} dispatched, {} samples",
            stats.lines_received,
            stats.lines_dispatched,
            stats.samples_appended
        );
    }
}
