//! Synthetic sensor feed for running without hardware
//!
//! Produces lines in the wire format `<seq>,<v0>,<v1>,...`, each channel a
//! sine in the 12-bit converter range at its own frequency, plus a little
//! noise.

use std::f64::consts::PI;

const MIDSCALE: f64 = 2048.0;
const AMPLITUDE: f64 = 1500.0;
const NOISE: f64 = 20.0;

/// Generator for mock feed lines
#[derive(Debug, Clone)]
pub struct MockFeed {
    channels: usize,
    seq: u64,
    seed: u64,
}

impl MockFeed {
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            seq: 0,
            seed: 0x2545_F491_4F6C_DD1D,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Frequency of channel `index` in Hz
    pub fn frequency(index: usize) -> f64 {
        1.0 + 2.0 * index as f64
    }

    /// Next line at `elapsed_secs` since the feed started
    pub fn next_line(&mut self, elapsed_secs: f64) -> String {
        let mut line = self.seq.to_string();
        self.seq += 1;
        for ch in 0..self.channels {
            let phase = 2.0 * PI * Self::frequency(ch) * elapsed_secs;
            let noise = (self.next_unit() - 0.5) * 2.0 * NOISE;
            let value = (MIDSCALE + AMPLITUDE * phase.sin() + noise).round();
            line.push(',');
            line.push_str(&value.to_string());
        }
        line
    }

    /// xorshift in [0, 1)
    fn next_unit(&mut self) -> f64 {
        let mut s = self.seed;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.seed = s;
        (s >> 11) as f64 / (1u64 << 53) as f64
    }
}
