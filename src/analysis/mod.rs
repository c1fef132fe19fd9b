//! Signal analysis
//!
//! - [`fft`]: windowed FFT producing a one-sided magnitude spectrum
//! - [`spectrum`]: per-channel history fed from raw frames

pub mod fft;
pub mod spectrum;

pub use fft::{FftAnalyzer, Spectrum, WindowFunction};
pub use spectrum::SpectrumView;
