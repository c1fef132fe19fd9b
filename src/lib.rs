//! # StreamScope: live charts for line-oriented sensor feeds
//!
//! A transport delivers raw text frames of records shaped
//! `<seq>,<ch1>,<ch2>,...`. Each enabled channel gets a rolling,
//! time-bounded buffer drawn as a scrolling strip chart; channels can be
//! paused individually and the whole display switches between a light and a
//! dark theme.
//!
//! ## Architecture
//!
//! - **Backend**: reads stdin, TCP, a serial port or a mock generator on its
//!   own threads and batches lines into frames
//! - **Pipeline**: parses, rate-limits and routes lines into per-channel
//!   windows on the UI thread
//! - **Frontend**: renders the charts using eframe/egui with egui_plot
//! - **Communication**: crossbeam channels between backend and UI
//!
//! ## Configuration
//!
//! Settings live in a TOML file under the platform config directory in
//! `dev.streamscope/config.toml`; see [`config`].
//!
//! ## Example
//!
//! ```ignore
//! use streamscope::pipeline::{ChannelRegistry, DispatcherOptions, FeedDispatcher};
//!
//! let mut surfaces = std::collections::HashMap::new();
//! let mut dispatcher = FeedDispatcher::new(
//!     ChannelRegistry::default(),
//!     DispatcherOptions::default(),
//!     &mut surfaces,
//! );
//! dispatcher.ingest_frame("17,512,498,0,1023\n");
//! ```

pub mod analysis;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontend;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use backend::{FeedBackend, FeedHandle, FeedMessage};
pub use config::AppConfig;
pub use error::{Result, StreamScopeError};
pub use frontend::StreamScopeApp;
pub use pipeline::{FeedDispatcher, Theme};
pub use types::{Channel, ChannelIndex, DispatchStats, Sample};
