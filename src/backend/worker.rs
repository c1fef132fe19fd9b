//! Backend worker loop
//!
//! Runs on its own thread. Lines arriving from the source thread are
//! gathered into a raw frame and handed to the UI once per frame interval.
//!
//! # Backpressure
//!
//! Frames are sent with `try_send`. When the UI falls behind and the queue is
//! full the frame is dropped and counted; the reader thread is never blocked.

use super::source::LineEvent;
use super::{FeedCommand, FeedMessage, FeedStats};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often statistics are pushed to the UI
const STATS_INTERVAL: Duration = Duration::from_secs(1);

/// How long the final messages wait for room in a full queue
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct FeedWorker {
    frame_interval: Duration,
    line_rx: Receiver<LineEvent>,
    message_tx: Sender<FeedMessage>,
    command_rx: Receiver<FeedCommand>,
    running: Arc<AtomicBool>,
    /// Lines collected since the last flush, newline separated
    frame: String,
    frame_lines: usize,
    last_flush: Instant,
    last_stats: Instant,
    stats: FeedStats,
}

impl FeedWorker {
    pub fn new(
        frame_interval: Duration,
        line_rx: Receiver<LineEvent>,
        message_tx: Sender<FeedMessage>,
        command_rx: Receiver<FeedCommand>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let now = Instant::now();
        Self {
            frame_interval,
            line_rx,
            message_tx,
            command_rx,
            running,
            frame: String::new(),
            frame_lines: 0,
            last_flush: now,
            last_stats: now,
            stats: FeedStats::default(),
        }
    }

    /// Run until stopped or the source ends. Always finishes with
    /// [`FeedMessage::Closed`].
    pub fn run(&mut self) -> FeedStats {
        tracing::info!(
            "Feed worker started, frame interval {:?}",
            self.frame_interval
        );

        while self.running.load(Ordering::SeqCst) {
            self.process_commands();
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let deadline = self.last_flush + self.frame_interval;
            match self.line_rx.recv_deadline(deadline) {
                Ok(LineEvent::Line(line)) => self.push_line(&line),
                Ok(LineEvent::Error(e)) => {
                    self.flush();
                    self.stats.errors += 1;
                    let _ = self
                        .message_tx
                        .send_timeout(FeedMessage::Error(e), CLOSE_TIMEOUT);
                    break;
                }
                Ok(LineEvent::Eof) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::info!("Feed source ended");
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            if self.last_flush.elapsed() >= self.frame_interval {
                self.flush();
            }
            if self.last_stats.elapsed() >= STATS_INTERVAL {
                self.send_stats();
            }
        }

        self.flush();
        self.running.store(false, Ordering::SeqCst);
        let _ = self.message_tx.try_send(FeedMessage::Stats(self.stats));
        let _ = self
            .message_tx
            .send_timeout(FeedMessage::Closed, CLOSE_TIMEOUT);
        tracing::info!(
            "Feed worker stopped: {} lines, {} frames, {} dropped",
            self.stats.lines_read,
            self.stats.frames_sent,
            self.stats.frames_dropped
        );
        self.stats
    }

    fn process_commands(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(FeedCommand::Stop) | Err(TryRecvError::Disconnected) => {
                    self.running.store(false, Ordering::SeqCst);
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
    }

    fn push_line(&mut self, line: &str) {
        self.stats.lines_read += 1;
        if self.frame_lines > 0 {
            self.frame.push('\n');
        }
        self.frame.push_str(line);
        self.frame_lines += 1;
    }

    /// Hand the collected lines to the UI as one frame.
    fn flush(&mut self) {
        self.last_flush = Instant::now();
        if self.frame_lines == 0 {
            return;
        }
        let frame = std::mem::take(&mut self.frame);
        self.frame_lines = 0;
        self.try_send_message(FeedMessage::Frame(frame));
    }

    fn send_stats(&mut self) {
        self.last_stats = Instant::now();
        let _ = self.message_tx.try_send(FeedMessage::Stats(self.stats));
    }

    fn try_send_message(&mut self, msg: FeedMessage) {
        if self.message_tx.try_send(msg).is_err() {
            self.stats.frames_dropped += 1;
            if self.stats.frames_dropped.is_power_of_two() {
                tracing::warn!(
                    "UI queue full, {} frames dropped so far",
                    self.stats.frames_dropped
                );
            }
        } else {
            self.stats.frames_sent += 1;
        }
    }
}
