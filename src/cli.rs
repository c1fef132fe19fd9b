//! Command-line interface
//!
//! Flags override values from the config file; anything not given on the
//! command line keeps the file's (or the default) value.

use crate::config::{default_config_path, AppConfig, SourceConfig, DEFAULT_BAUD_RATE};
use crate::error::{Result, StreamScopeError};
use crate::pipeline::appearance::Theme;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Transport selector accepted by `--source`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Stdin,
    Tcp,
    Serial,
    Mock,
}

#[derive(Debug, Parser)]
#[command(
    name = "streamscope",
    version,
    about = "Live strip charts for line-oriented sensor feeds",
    long_about = "Reads comma separated sensor records (`<seq>,<ch1>,<ch2>,...`) from stdin, \
                  TCP, a serial port or a built-in generator and plots each enabled channel."
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, env = "STREAMSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Feed transport
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// TCP address for `--source tcp`
    #[arg(long)]
    pub addr: Option<String>,

    /// Serial device for `--source serial`
    #[arg(long)]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(long)]
    pub baud: Option<u32>,

    /// Initial theme (light or dark)
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Minimum interval between dispatched lines, in milliseconds
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    pub save_config: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Config file location: `--config` or the platform default.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(default_config_path)
    }

    /// Default tracing filter for the verbosity level
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info,streamscope=debug",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides and re-validate.
    pub fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(kind) = self.source {
            config.feed.source = match kind {
                SourceKind::Stdin => SourceConfig::Stdin,
                SourceKind::Tcp => SourceConfig::Tcp {
                    addr: self.addr.clone().ok_or_else(|| {
                        StreamScopeError::Config("--source tcp needs --addr".to_string())
                    })?,
                },
                SourceKind::Serial => SourceConfig::Serial {
                    port: self.port.clone().ok_or_else(|| {
                        StreamScopeError::Config("--source serial needs --port".to_string())
                    })?,
                    baud: self.baud.unwrap_or(DEFAULT_BAUD_RATE),
                },
                SourceKind::Mock => SourceConfig::default(),
            };
        } else {
            match &mut config.feed.source {
                SourceConfig::Tcp { addr } => {
                    if let Some(a) = &self.addr {
                        *addr = a.clone();
                    }
                }
                SourceConfig::Serial { port, baud } => {
                    if let Some(p) = &self.port {
                        *port = p.clone();
                    }
                    if let Some(b) = self.baud {
                        *baud = b;
                    }
                }
                _ => {}
            }
        }

        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(ms) = self.throttle_ms {
            config.throttle_ms = ms;
        }

        config.validate()
    }
}
