//! Display settings for charts and the spectral view
//!
//! These settings only affect how buffered data is drawn. Changing any of
//! them never touches the window buffers.
//!
//! # Main Types
//!
//! - [`ChartSettings`] - Scroll speed, grid spacing, stroke width, stream delay
//! - [`ScaleMode`] - Fixed ADC-resolution Y ranges or auto-fit
//! - [`SpectralConfig`] - Sample rate and frequency ceiling of the spectrum
//! - [`UiPreferences`] - Per-user choices restored on the next start

use crate::pipeline::appearance::Theme;
use serde::{Deserialize, Serialize};

/// Y-axis scaling of the channel charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// 10-bit converter range, 0..=1023
    Bits10,
    /// 12-bit converter range, 0..=4095
    Bits12,
    /// 14-bit converter range, 0..=16383
    Bits14,
    /// Fit the visible data
    #[default]
    Auto,
}

impl ScaleMode {
    pub fn all() -> &'static [ScaleMode] {
        &[
            ScaleMode::Bits10,
            ScaleMode::Bits12,
            ScaleMode::Bits14,
            ScaleMode::Auto,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ScaleMode::Bits10 => "10 bits",
            ScaleMode::Bits12 => "12 bits",
            ScaleMode::Bits14 => "14 bits",
            ScaleMode::Auto => "Auto Scale",
        }
    }

    /// Resolution in bits, `None` for auto scaling.
    pub fn bits(&self) -> Option<u32> {
        match self {
            ScaleMode::Bits10 => Some(10),
            ScaleMode::Bits12 => Some(12),
            ScaleMode::Bits14 => Some(14),
            ScaleMode::Auto => None,
        }
    }

    /// Fixed Y range `(0, 2^bits - 1)`, `None` for auto scaling.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.bits().map(|b| (0.0, ((1u64 << b) - 1) as f64))
    }
}

/// Chart rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Time represented by one horizontal pixel
    pub millis_per_pixel: f64,
    /// Spacing of vertical grid lines
    pub grid_millis_per_line: u64,
    /// Stroke width of the series line
    pub line_width: f32,
    /// How far the right edge of a running chart trails wall clock
    pub stream_delay_ms: u64,
    /// Y-axis scaling
    pub scale: ScaleMode,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            millis_per_pixel: 12.0,
            grid_millis_per_line: 250,
            line_width: 1.0,
            stream_delay_ms: 500,
            scale: ScaleMode::Auto,
        }
    }
}

impl ChartSettings {
    /// Visible time span in milliseconds for a chart `width_px` wide.
    pub fn visible_span_ms(&self, width_px: f32) -> f64 {
        self.millis_per_pixel * width_px.max(1.0) as f64
    }
}

/// Spectral view options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Nominal line rate of the feed
    pub sample_rate_hz: f64,
    /// Highest frequency shown
    pub max_freq_hz: f64,
    /// Number of most recent values per channel fed to the FFT
    pub history_len: usize,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 200.0,
            max_freq_hz: crate::pipeline::spectral::DEFAULT_MAX_FREQ_HZ,
            history_len: 512,
        }
    }
}

/// UI choices persisted by the frontend between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub scale: ScaleMode,
}
