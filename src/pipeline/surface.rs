//! Render-target binding.
//!
//! Each enabled channel is bound once, at pipeline construction, to an opaque
//! [`RenderTarget`] looked up by its [`SurfaceId`] through an injected
//! [`SurfaceRegistry`]. The pipeline never draws pixels; it only forwards
//! samples, scroll start/stop and styling to the bound target.

use crate::pipeline::appearance::AppearanceProfile;
use crate::types::{ChannelIndex, Sample};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a drawable surface, e.g. `chart-1` for channel 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Conventional surface name for a channel (1-based).
    pub fn for_channel(index: ChannelIndex) -> Self {
        Self(format!("chart-{}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live chart that draws one channel.
#[cfg_attr(test, mockall::automock)]
pub trait RenderTarget {
    /// A sample was appended to the channel's window.
    fn on_sample(&mut self, sample: &Sample);

    /// Freeze scrolling. Already drawn data stays.
    fn stop(&mut self);

    /// Resume live scrolling.
    fn start(&mut self);

    /// Restyle in place. Must be idempotent.
    fn apply_appearance(&mut self, profile: &AppearanceProfile);
}

/// Resolves surface identifiers to render targets.
pub trait SurfaceRegistry {
    fn resolve(&mut self, id: &SurfaceId) -> Option<Box<dyn RenderTarget>>;
}

impl SurfaceRegistry for HashMap<SurfaceId, Box<dyn RenderTarget>> {
    fn resolve(&mut self, id: &SurfaceId) -> Option<Box<dyn RenderTarget>> {
        self.remove(id)
    }
}

impl<F> SurfaceRegistry for F
where
    F: FnMut(&SurfaceId) -> Option<Box<dyn RenderTarget>>,
{
    fn resolve(&mut self, id: &SurfaceId) -> Option<Box<dyn RenderTarget>> {
        self(id)
    }
}
