//! Pass-through contract for the companion frequency-domain view.
//!
//! The dispatcher hands every raw frame, unmodified, to an optional
//! [`SpectralSink`] together with the configured frequency ceiling. Nothing
//! else is shared with the spectral view.

/// Default upper frequency shown by the spectral view, in Hz.
pub const DEFAULT_MAX_FREQ_HZ: f64 = 100.0;

pub trait SpectralSink {
    fn on_frame(&mut self, frame: &str, max_freq_hz: f64);
}

impl<F> SpectralSink for F
where
    F: FnMut(&str, f64),
{
    fn on_frame(&mut self, frame: &str, max_freq_hz: f64) {
        self(frame, max_freq_hz)
    }
}
