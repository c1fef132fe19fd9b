//! Status bar - bottom bar showing feed state, dispatch stats and errors.

use egui::{Color32, RichText, Ui};

use crate::backend::FeedStats;
use crate::types::DispatchStats;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub source: &'a str,
    pub feed_running: bool,
    pub feed: &'a FeedStats,
    pub dispatch: &'a DispatchStats,
    pub paused_channels: usize,
    pub last_error: Option<&'a str>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let (status_color, status_text) = if ctx.feed_running {
            (Color32::GREEN, "Streaming")
        } else if ctx.last_error.is_some() {
            (Color32::RED, "Error")
        } else {
            (Color32::GRAY, "Closed")
        };
        ui.colored_label(status_color, "●");
        ui.label(RichText::new(format!("{}: {}", status_text, ctx.source)).small());

        ui.separator();

        ui.label(RichText::new(format!("Lines: {}", ctx.dispatch.lines_received)).small());
        ui.label(
            RichText::new(format!(
                "Dispatched: {} ({:.1}%)",
                ctx.dispatch.lines_dispatched,
                ctx.dispatch.dispatch_rate()
            ))
            .small(),
        );
        ui.label(RichText::new(format!("Samples: {}", ctx.dispatch.samples_appended)).small());

        ui.separator();

        let invalid_color = if ctx.dispatch.invalid_fields > 0 {
            Color32::LIGHT_RED
        } else {
            Color32::GRAY
        };
        ui.colored_label(
            invalid_color,
            RichText::new(format!("Invalid: {}", ctx.dispatch.invalid_fields)).small(),
        );

        if ctx.feed.frames_dropped > 0 {
            ui.colored_label(
                Color32::YELLOW,
                RichText::new(format!("Dropped frames: {}", ctx.feed.frames_dropped)).small(),
            );
        }

        if ctx.paused_channels > 0 {
            ui.separator();
            ui.label(RichText::new(format!("Paused: {}", ctx.paused_channels)).small());
        }

        if let Some(error) = ctx.last_error {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(Color32::RED, RichText::new(error).small());
            });
        }
    });
}
