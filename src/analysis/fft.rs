//! FFT analysis of channel history
//!
//! Turns the most recent values of a channel into a one-sided magnitude
//! spectrum, cut off at a configurable ceiling frequency.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// Taper applied to the input block before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// No taper
    Rectangular,
    /// Raised cosine, the general purpose choice
    #[default]
    Hann,
    /// Raised cosine with a pedestal
    Hamming,
}

impl WindowFunction {
    pub fn display_name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "Rectangular",
            WindowFunction::Hann => "Hann",
            WindowFunction::Hamming => "Hamming",
        }
    }

    /// Coefficient at position `i` out of `n`
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        let phase = 2.0 * PI * i as f64 / n as f64;
        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
        }
    }
}

/// One-sided magnitude spectrum
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Bin centre frequencies in Hz, ascending
    pub frequencies: Vec<f64>,
    /// Normalised linear magnitudes, same length as `frequencies`
    pub magnitudes: Vec<f64>,
    /// Hz per bin
    pub resolution_hz: f64,
}

impl Spectrum {
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Strongest bin above DC as `(frequency, magnitude)`
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .skip(1)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(&f, &m)| (f, m))
    }

    pub fn plot_points(&self) -> Vec<[f64; 2]> {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .map(|(&f, &m)| [f, m])
            .collect()
    }
}

/// Reusable FFT planner plus settings
pub struct FftAnalyzer {
    planner: FftPlanner<f64>,
    window: WindowFunction,
    remove_dc: bool,
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::new(WindowFunction::default())
    }
}

impl FftAnalyzer {
    pub fn new(window: WindowFunction) -> Self {
        Self {
            planner: FftPlanner::new(),
            window,
            remove_dc: true,
        }
    }

    pub fn with_dc_removal(mut self, remove_dc: bool) -> Self {
        self.remove_dc = remove_dc;
        self
    }

    pub fn window(&self) -> WindowFunction {
        self.window
    }

    /// Spectrum of `samples` taken at `sample_rate_hz`, bins above
    /// `max_freq_hz` dropped.
    ///
    /// The block is zero padded to the next power of two. Non-finite inputs
    /// are treated as zero.
    pub fn compute(&mut self, samples: &[f64], sample_rate_hz: f64, max_freq_hz: f64) -> Spectrum {
        let n = samples.len();
        if n < 2 || sample_rate_hz <= 0.0 {
            return Spectrum::default();
        }

        let mean = if self.remove_dc {
            samples.iter().filter(|v| v.is_finite()).sum::<f64>() / n as f64
        } else {
            0.0
        };

        let size = n.next_power_of_two();
        let mut buffer: Vec<Complex<f64>> = samples
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let v = if v.is_finite() { v - mean } else { 0.0 };
                Complex::new(v * self.window.coefficient(i, n), 0.0)
            })
            .collect();
        buffer.resize(size, Complex::new(0.0, 0.0));

        self.planner.plan_fft_forward(size).process(&mut buffer);

        let resolution_hz = sample_rate_hz / size as f64;
        let ceiling = max_freq_hz.min(sample_rate_hz / 2.0);
        let scale = 2.0 / n as f64;

        let (frequencies, magnitudes) = buffer
            .iter()
            .take(size / 2 + 1)
            .enumerate()
            .map(|(i, c)| (i as f64 * resolution_hz, c.norm() * scale))
            .take_while(|(f, _)| *f <= ceiling)
            .unzip();

        Spectrum {
            frequencies,
            magnitudes,
            resolution_hz,
        }
    }
}

impl std::fmt::Debug for FftAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftAnalyzer")
            .field("window", &self.window)
            .field("remove_dc", &self.remove_dc)
            .finish()
    }
}
