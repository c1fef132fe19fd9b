//! Top toolbar: theme, Y scale and spectrum toggle.

use crate::config::{ScaleMode, UiPreferences};
use crate::pipeline::appearance::Theme;
use egui::Ui;

/// What the user changed this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    SetTheme(Theme),
    SetScale(ScaleMode),
    ToggleSpectrum,
    PauseAll,
    ResumeAll,
}

pub fn render_toolbar(ui: &mut Ui, prefs: &UiPreferences, show_spectrum: bool) -> Vec<ToolbarAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Theme:");
        egui::ComboBox::from_id_salt("theme_selector")
            .selected_text(prefs.theme.display_name())
            .width(80.0)
            .show_ui(ui, |ui| {
                for &theme in Theme::all() {
                    if ui
                        .selectable_label(prefs.theme == theme, theme.display_name())
                        .clicked()
                    {
                        actions.push(ToolbarAction::SetTheme(theme));
                    }
                }
            });

        ui.separator();

        ui.label("Scale:");
        egui::ComboBox::from_id_salt("scale_selector")
            .selected_text(prefs.scale.display_name())
            .width(100.0)
            .show_ui(ui, |ui| {
                for &scale in ScaleMode::all() {
                    if ui
                        .selectable_label(prefs.scale == scale, scale.display_name())
                        .clicked()
                    {
                        actions.push(ToolbarAction::SetScale(scale));
                    }
                }
            });

        ui.separator();

        if ui.selectable_label(show_spectrum, "Spectrum").clicked() {
            actions.push(ToolbarAction::ToggleSpectrum);
        }

        ui.separator();

        if ui.button("⏸ All").clicked() {
            actions.push(ToolbarAction::PauseAll);
        }
        if ui.button("▶ All").clicked() {
            actions.push(ToolbarAction::ResumeAll);
        }
    });

    actions
}
