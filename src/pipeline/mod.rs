//! Streaming pipeline: raw text frames to per-channel rolling windows.
//!
//! # Architecture
//!
//! ```text
//! raw frame ─► parser ─► throttle ─► dispatcher ─► pause gate ─► window ─► render target
//!                                                          appearance ──┘
//! ```
//!
//! # Design
//!
//! - **Single-threaded**: the dispatcher runs on the UI thread; transports feed
//!   it frames over a channel from the backend thread.
//! - **Cooperative throttling**: `Throttle` has no timer of its own; the host
//!   calls `FeedDispatcher::tick` and schedules wake-ups from `next_deadline`.
//! - **Injected surfaces**: render targets are resolved once, by `SurfaceId`,
//!   when the dispatcher is built.
//! - **Lossy**: malformed fields and paused channels produce no sample;
//!   nothing in the hot path returns an error.

pub mod appearance;
pub mod clock;
pub mod dispatcher;
pub mod parser;
pub mod pause;
pub mod registry;
pub mod spectral;
pub mod surface;
pub mod throttle;
pub mod window;

pub use appearance::{AppearanceAdapter, AppearanceProfile, Rgba, Theme};
pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::{ChannelView, DispatcherOptions, FeedDispatcher};
pub use parser::{parse_line, ParsedLine};
pub use pause::PauseController;
pub use registry::{ChannelRegistry, DEFAULT_CHANNELS};
pub use spectral::SpectralSink;
pub use surface::{RenderTarget, SurfaceId, SurfaceRegistry};
pub use throttle::Throttle;
pub use window::WindowBuffer;
