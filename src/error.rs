//! Error handling for StreamScope
//!
//! The streaming core (parsing, dispatch, pause, theming) is infallible by
//! construction: a bad field or a missing surface degrades to "no sample".
//! The errors defined here belong to the edges of the system: loading
//! configuration, opening transports and talking across thread channels.

use thiserror::Error;

/// Main error type for StreamScope operations
#[derive(Error, Debug)]
pub enum StreamScopeError {
    /// Errors related to configuration loading/saving/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised while opening or reading a feed transport
    #[error("Source error: {0}")]
    Source(String),

    /// Errors related to channel communication between threads
    #[error("Channel error: {0}")]
    Channel(String),

    /// Configuration file could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StreamScopeError>,
    },
}

impl StreamScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StreamScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serialport::Error> for StreamScopeError {
    fn from(err: serialport::Error) -> Self {
        StreamScopeError::Source(err.to_string())
    }
}

/// Result type alias for StreamScope operations
pub type Result<T> = std::result::Result<T, StreamScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StreamScopeError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
