//! Spectrum panel - frequency view of every enabled channel

use super::charts::color32;
use crate::analysis::SpectrumView;
use crate::pipeline::appearance::AppearanceProfile;
use crate::types::ChannelIndex;
use egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds};

/// Per-channel hue so overlaid spectra stay distinguishable
fn channel_color(index: ChannelIndex, profile: &AppearanceProfile) -> Color32 {
    const PALETTE: [Color32; 6] = [
        Color32::from_rgb(0, 200, 0),
        Color32::from_rgb(66, 135, 245),
        Color32::from_rgb(245, 166, 35),
        Color32::from_rgb(220, 60, 60),
        Color32::from_rgb(170, 90, 220),
        Color32::from_rgb(40, 200, 200),
    ];
    if index == 0 {
        color32(profile.line)
    } else {
        PALETTE[index % PALETTE.len()]
    }
}

pub fn render(
    ui: &mut Ui,
    spectrum: &SpectrumView,
    channels: &[ChannelIndex],
    profile: &AppearanceProfile,
) {
    let max_freq = spectrum.max_freq_hz();

    ui.horizontal(|ui| {
        ui.heading("Spectrum");
        ui.separator();
        ui.label(RichText::new(format!("0 - {:.0} Hz", max_freq)).small());
        if ui.small_button("Clear").clicked() {
            spectrum.clear();
        }
    });

    let spectra: Vec<_> = channels
        .iter()
        .filter_map(|&i| spectrum.spectrum(i).map(|s| (i, s)))
        .filter(|(_, s)| !s.is_empty())
        .collect();

    for (index, s) in &spectra {
        if let Some((freq, mag)) = s.peak() {
            ui.label(
                RichText::new(format!("Ch-{} peak {:.2} Hz ({:.1})", index + 1, freq, mag))
                    .small(),
            );
        }
    }

    let y_max = spectra
        .iter()
        .flat_map(|(_, s)| s.magnitudes.iter().copied())
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;

    Plot::new("spectrum_plot")
        .legend(Legend::default())
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_label("Hz")
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, 0.0], [max_freq, y_max]));
            for (index, s) in spectra {
                plot_ui.line(
                    Line::new(format!("Ch-{}", index + 1), s.plot_points())
                        .color(channel_color(index, profile))
                        .width(1.0),
                );
            }
        });
}
