//! Configuration module for StreamScope
//!
//! This module handles application configuration including:
//! - The channel layout (which record fields are displayed)
//! - Dispatch tuning (throttle interval, retention horizon)
//! - Feed transport selection
//! - Chart and spectral display settings
//!
//! # File Location
//!
//! The configuration is a TOML file. Unless a path is given explicitly it is
//! read from the platform config directory under `dev.streamscope`:
//!
//! - **Linux**: `~/.config/dev.streamscope/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.streamscope/config.toml`
//! - **Windows**: `%APPDATA%\dev.streamscope\config.toml`
//!
//! # Example
//!
//! ```toml
//! channels = [true, true, true, true, false, false]
//! throttle_ms = 100
//! theme = "dark"
//!
//! [feed]
//! frame_interval_ms = 50
//!
//! [feed.source]
//! kind = "tcp"
//! addr = "127.0.0.1:9000"
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, StreamScopeError};
use crate::pipeline::appearance::Theme;
use crate::pipeline::dispatcher::DispatcherOptions;
use crate::pipeline::registry::{ChannelRegistry, DEFAULT_CHANNELS};
use crate::pipeline::throttle::DEFAULT_THROTTLE_MS;
use crate::pipeline::window::{DEFAULT_MAX_POINTS, DEFAULT_RETENTION_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "dev.streamscope";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default baud rate for serial feeds
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default interval at which the backend batches lines into a frame
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 50;

/// Default number of frames buffered between backend and UI
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Line period of a mock feed running at `rate_hz`, or `None` if the rate is
/// not finite and positive or the period does not fit a [`Duration`].
pub fn mock_period(rate_hz: f64) -> Option<Duration> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / rate_hz).ok()
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

/// Where raw text lines come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Lines piped into standard input
    Stdin,
    /// Lines read from a TCP stream
    Tcp { addr: String },
    /// Lines read from a serial port
    Serial {
        port: String,
        #[serde(default = "default_baud_rate")]
        baud: u32,
    },
    /// Synthetic waveforms, one line per tick
    Mock {
        #[serde(default = "default_mock_rate")]
        rate_hz: f64,
        #[serde(default = "default_mock_channels")]
        channels: usize,
    },
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_mock_rate() -> f64 {
    200.0
}

fn default_mock_channels() -> usize {
    DEFAULT_CHANNELS.len()
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Mock {
            rate_hz: default_mock_rate(),
            channels: default_mock_channels(),
        }
    }
}

impl SourceConfig {
    /// Short description for logs and the status bar
    pub fn describe(&self) -> String {
        match self {
            SourceConfig::Stdin => "stdin".to_string(),
            SourceConfig::Tcp { addr } => format!("tcp://{}", addr),
            SourceConfig::Serial { port, baud } => format!("serial {} @ {}", port, baud),
            SourceConfig::Mock { rate_hz, channels } => {
                format!("mock {} ch @ {} Hz", channels, rate_hz)
            }
        }
    }
}

/// Backend feed settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: SourceConfig,
    /// Lines read within this interval are delivered as one raw frame
    pub frame_interval_ms: u64,
    /// Frames buffered towards the UI before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Enabled flag per positional channel field
    pub channels: Vec<bool>,
    /// Minimum interval between dispatched lines
    pub throttle_ms: u64,
    /// Rolling window length per channel
    pub retention_ms: u64,
    /// Hard cap on points per channel
    pub max_points_per_channel: usize,
    /// Initial theme
    pub theme: Theme,
    pub chart: ChartSettings,
    pub feed: FeedConfig,
    pub spectral: SpectralConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS.to_vec(),
            throttle_ms: DEFAULT_THROTTLE_MS,
            retention_ms: DEFAULT_RETENTION_MS,
            max_points_per_channel: DEFAULT_MAX_POINTS,
            theme: Theme::default(),
            chart: ChartSettings::default(),
            feed: FeedConfig::default(),
            spectral: SpectralConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StreamScopeError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| StreamScopeError::from(e).with_context(format!("{:?}", path)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, returning defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StreamScopeError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content).map_err(|e| {
            StreamScopeError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Check invariants the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(StreamScopeError::Config(
                "at least one channel must be configured".to_string(),
            ));
        }
        if !self.channels.iter().any(|&on| on) {
            return Err(StreamScopeError::Config(
                "at least one channel must be enabled".to_string(),
            ));
        }
        if self.throttle_ms == 0 {
            return Err(StreamScopeError::Config(
                "throttle_ms must be greater than zero".to_string(),
            ));
        }
        if self.retention_ms == 0 {
            return Err(StreamScopeError::Config(
                "retention_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_points_per_channel == 0 {
            return Err(StreamScopeError::Config(
                "max_points_per_channel must be greater than zero".to_string(),
            ));
        }
        if !(self.spectral.max_freq_hz > 0.0) {
            return Err(StreamScopeError::Config(
                "spectral.max_freq_hz must be positive".to_string(),
            ));
        }
        if self.feed.frame_interval_ms == 0 || self.feed.queue_capacity == 0 {
            return Err(StreamScopeError::Config(
                "feed.frame_interval_ms and feed.queue_capacity must be non-zero".to_string(),
            ));
        }
        match &self.feed.source {
            SourceConfig::Tcp { addr } if addr.trim().is_empty() => Err(
                StreamScopeError::Config("tcp source needs an address".to_string()),
            ),
            SourceConfig::Serial { port, .. } if port.trim().is_empty() => Err(
                StreamScopeError::Config("serial source needs a port".to_string()),
            ),
            SourceConfig::Mock { rate_hz, channels }
                if mock_period(*rate_hz).is_none() || *channels == 0 =>
            {
                Err(StreamScopeError::Config(
                    "mock source needs a positive rate and at least one channel".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Channel registry described by this config
    pub fn registry(&self) -> ChannelRegistry {
        ChannelRegistry::new(self.channels.clone())
    }

    /// Dispatcher tuning described by this config
    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            throttle: Duration::from_millis(self.throttle_ms),
            retention: Duration::from_millis(self.retention_ms),
            max_points: self.max_points_per_channel,
            theme: self.theme,
            max_freq_hz: self.spectral.max_freq_hz,
        }
    }
}
