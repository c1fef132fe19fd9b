//! Channel chart rendering using egui_plot
//!
//! Each enabled channel gets a strip with a header (label, pause/play
//! button, latest value) above a scrolling plot of its window buffer.
//! The X axis is seconds since the app started.

use super::surface::PlotSurface;
use crate::config::{ChartSettings, ScaleMode};
use crate::pipeline::appearance::Rgba;
use crate::pipeline::dispatcher::ChannelView;
use crate::types::Channel;
use egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{GridMark, Line, Plot, PlotBounds, PlotPoints};
use std::time::Duration;

/// Convert a pipeline color to egui
pub fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Y bounds for the visible data: fixed range for bit scales, padded data
/// range for auto scale.
pub fn y_bounds(scale: ScaleMode, data_range: Option<(f64, f64)>) -> (f64, f64) {
    if let Some(range) = scale.y_range() {
        return range;
    }
    match data_range {
        Some((min, max)) if (max - min).abs() > f64::EPSILON => {
            let pad = (max - min) * 0.1;
            (min - pad, max + pad)
        }
        Some((v, _)) => (v - 1.0, v + 1.0),
        None => (0.0, 1.0),
    }
}

/// Vertical grid lines every `step_ms`, in plot seconds
fn time_grid_marks(bounds: (f64, f64), step_ms: u64) -> Vec<GridMark> {
    let step = step_ms.max(1) as f64 / 1000.0;
    let (min, max) = bounds;
    // keep the mark count sane when zoomed far out
    if (max - min) / step > 400.0 {
        return Vec::new();
    }
    let mut marks = Vec::new();
    let mut current = (min / step).floor() * step;
    while current <= max {
        marks.push(GridMark {
            value: current,
            step_size: step,
        });
        current += step;
    }
    marks
}

/// Inputs for drawing one channel strip
pub struct ChartContext<'a> {
    pub settings: &'a ChartSettings,
    pub scale: ScaleMode,
    /// Wall clock now
    pub now_ms: i64,
    /// Time at X = 0
    pub origin_ms: i64,
    pub height: f32,
}

/// Time span shown across `width_px`, never longer than the channel keeps
/// samples for.
pub fn visible_span_ms(settings: &ChartSettings, width_px: f32, retention: Duration) -> f64 {
    settings
        .visible_span_ms(width_px)
        .min(retention.as_millis() as f64)
}

/// Draw one channel. Returns true when its pause/play button was clicked.
pub fn show_channel(
    ui: &mut Ui,
    channel: Channel,
    view: &ChannelView,
    surface: Option<&PlotSurface>,
    ctx: &ChartContext<'_>,
) -> bool {
    let mut toggled = false;

    ui.horizontal(|ui| {
        ui.label(RichText::new(channel.label()).strong());
        let (icon, hint) = if channel.paused {
            ("▶", "Resume this channel")
        } else {
            ("⏸", "Pause this channel")
        };
        if ui.small_button(icon).on_hover_text(hint).clicked() {
            toggled = true;
        }
        if channel.paused {
            ui.colored_label(Color32::YELLOW, RichText::new("paused").small());
        }
        if let Some(sample) = view.window().latest() {
            ui.label(RichText::new(format!("{:.1}", sample.value)).monospace());
        }
        ui.label(
            RichText::new(format!("{} pts", view.window().len()))
                .small()
                .weak(),
        );
    });

    let Some(surface) = surface else {
        ui.colored_label(
            Color32::GRAY,
            format!("no surface bound for {}", view.surface_id()),
        );
        return toggled;
    };

    let profile = surface.profile();
    let right_ms = surface.advance(ctx.now_ms - ctx.settings.stream_delay_ms as i64);
    let span_ms = visible_span_ms(
        ctx.settings,
        ui.available_width(),
        view.window().retention(),
    );
    let left_ms = right_ms - span_ms as i64;

    let x_min = (left_ms - ctx.origin_ms) as f64 / 1000.0;
    let x_max = (right_ms - ctx.origin_ms) as f64 / 1000.0;
    let (y_min, y_max) = y_bounds(ctx.scale, view.window().value_range_since(left_ms));

    let points: PlotPoints = view.window().plot_points(ctx.origin_ms).into();
    let grid_step = ctx.settings.grid_millis_per_line;

    egui::Frame::new()
        .fill(color32(profile.background))
        .stroke(Stroke::new(1.0, color32(profile.grid)))
        .show(ui, |ui| {
            ui.visuals_mut().override_text_color = Some(color32(profile.text));
            Plot::new(view.surface_id().as_str())
                .height(ctx.height)
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .show_background(false)
                .show_axes([true, true])
                .x_grid_spacer(move |input| time_grid_marks(input.bounds, grid_step))
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [x_min, y_min],
                        [x_max, y_max],
                    ));
                    plot_ui.line(
                        Line::new(channel.label(), points)
                            .color(color32(profile.line))
                            .width(ctx.settings.line_width),
                    );
                });
        });

    toggled
}
