//! Backend feed handling
//!
//! Transport I/O runs off the UI thread. A reader thread turns the source
//! into lines, the [`FeedWorker`] batches them into raw frames and the UI
//! drains those through a [`FeedHandle`].
//!
//! # Architecture
//!
//! ```text
//! source thread ──LineEvent──► FeedWorker ──FeedMessage──► FeedHandle (UI)
//!                                   ◄──────FeedCommand──────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use streamscope::backend::FeedBackend;
//! use streamscope::config::FeedConfig;
//!
//! let (backend, handle) = FeedBackend::new(FeedConfig::default());
//! std::thread::spawn(move || backend.run());
//!
//! for msg in handle.drain() {
//!     if let FeedMessage::Frame(frame) = msg {
//!         dispatcher.ingest_frame(&frame);
//!     }
//! }
//! ```

pub mod mock_feed;
pub mod source;
pub mod worker;

pub use mock_feed::MockFeed;
pub use source::{open_reader, pump_lines, spawn_source, LineEvent};
pub use worker::FeedWorker;

use crate::config::FeedConfig;
use crate::error::{Result, StreamScopeError};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Message sent from the backend to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Newline-separated lines read during one frame interval
    Frame(String),
    /// Transport statistics
    Stats(FeedStats),
    /// The transport failed
    Error(String),
    /// The backend stopped; nothing follows
    Closed,
}

/// Message sent from the UI to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    Stop,
}

/// Transport-side counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub lines_read: u64,
    pub frames_sent: u64,
    /// Frames lost to a full UI queue
    pub frames_dropped: u64,
    pub errors: u64,
}

/// UI-side end of the feed
pub struct FeedHandle {
    receiver: Receiver<FeedMessage>,
    command_sender: Sender<FeedCommand>,
    running: Arc<AtomicBool>,
}

impl FeedHandle {
    /// Try to receive a message without blocking
    pub fn try_recv(&self) -> Option<FeedMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<FeedMessage> {
        self.receiver.try_iter().collect()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Send a command to the backend worker.
    pub fn send_command(&self, command: FeedCommand) -> Result<()> {
        self.command_sender
            .try_send(command)
            .map_err(|e| StreamScopeError::Channel(format!("{:?} not delivered: {}", command, e)))
    }

    /// Ask the backend to stop. Reader threads exit at their next timeout.
    pub fn stop(&self) {
        if let Err(e) = self.send_command(FeedCommand::Stop) {
            tracing::debug!("Feed backend already gone: {}", e);
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Backend half, moved onto its own thread and consumed by [`FeedBackend::run`].
pub struct FeedBackend {
    config: FeedConfig,
    message_sender: Sender<FeedMessage>,
    command_receiver: Receiver<FeedCommand>,
    running: Arc<AtomicBool>,
}

impl FeedBackend {
    /// Create a backend and the handle the UI keeps.
    pub fn new(config: FeedConfig) -> (Self, FeedHandle) {
        let (msg_tx, msg_rx) = bounded(config.queue_capacity.max(1));
        let (cmd_tx, cmd_rx) = bounded(16);
        let running = Arc::new(AtomicBool::new(true));

        let handle = FeedHandle {
            receiver: msg_rx,
            command_sender: cmd_tx,
            running: running.clone(),
        };
        let backend = Self {
            config,
            message_sender: msg_tx,
            command_receiver: cmd_rx,
            running,
        };
        (backend, handle)
    }

    /// Open the source and run the worker loop until it ends.
    pub fn run(self) {
        tracing::info!("Opening feed source: {}", self.config.source.describe());

        let line_rx = match spawn_source(&self.config.source, self.running.clone()) {
            Ok(rx) => rx,
            Err(e) => {
                tracing::error!("Failed to open feed source: {}", e);
                self.running.store(false, Ordering::SeqCst);
                let _ = self.message_sender.send(FeedMessage::Error(e.to_string()));
                let _ = self.message_sender.send(FeedMessage::Closed);
                return;
            }
        };

        let mut worker = FeedWorker::new(
            Duration::from_millis(self.config.frame_interval_ms),
            line_rx,
            self.message_sender,
            self.command_receiver,
            self.running,
        );
        worker.run();
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;

    #[test]
    fn test_unreachable_source_reports_error_then_closed() {
        let config = FeedConfig {
            source: SourceConfig::Serial {
                port: "/definitely/not/a/port".into(),
                baud: 9600,
            },
            ..Default::default()
        };
        let (backend, handle) = FeedBackend::new(config);
        backend.run();

        let messages = handle.drain();
        assert!(matches!(messages.first(), Some(FeedMessage::Error(_))));
        assert_eq!(messages.last(), Some(&FeedMessage::Closed));
        assert!(!handle.is_running());
    }

    #[test]
    fn test_command_to_finished_backend_is_a_channel_error() {
        let (backend, handle) = FeedBackend::new(FeedConfig::default());
        drop(backend);

        let err = handle.send_command(FeedCommand::Stop).unwrap_err();
        assert!(matches!(err, StreamScopeError::Channel(_)));
        handle.stop();
        assert!(!handle.is_running());
    }

    #[test]
    fn test_unusable_mock_rate_reports_error_then_closed() {
        for rate_hz in [f64::NAN, 1e-300] {
            let config = FeedConfig {
                source: SourceConfig::Mock {
                    rate_hz,
                    channels: 2,
                },
                ..Default::default()
            };
            let (backend, handle) = FeedBackend::new(config);
            let result = std::thread::spawn(move || backend.run()).join();
            assert!(result.is_ok(), "backend panicked at rate {}", rate_hz);

            let messages = handle.drain();
            assert!(matches!(messages.first(), Some(FeedMessage::Error(_))));
            assert_eq!(messages.last(), Some(&FeedMessage::Closed));
            assert!(!handle.is_running());
        }
    }

    #[test]
    fn test_mock_backend_delivers_frames() {
        let config = FeedConfig {
            source: SourceConfig::Mock {
                rate_hz: 500.0,
                channels: 2,
            },
            frame_interval_ms: 20,
            queue_capacity: 8,
        };
        let (backend, handle) = FeedBackend::new(config);
        let thread = std::thread::spawn(move || backend.run());

        let first = handle
            .receiver
            .recv_timeout(Duration::from_secs(2))
            .unwrap();
        handle.stop();
        thread.join().unwrap();

        match first {
            FeedMessage::Frame(frame) => assert!(frame.lines().count() >= 1),
            other => panic!("unexpected message {:?}", other),
        }
    }
}
