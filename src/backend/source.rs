//! Line sources
//!
//! Every transport is reduced to a reader thread that pushes [`LineEvent`]s
//! into an unbounded channel. Blocking transports (TCP, serial) are opened
//! with a short read timeout so the thread notices a stop request.

use super::mock_feed::MockFeed;
use crate::config::{mock_period, SourceConfig};
use crate::error::{Result, ResultExt, StreamScopeError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{BufRead, BufReader, ErrorKind};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Read timeout for blocking transports
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// What a reader thread reports
#[derive(Debug, Clone, PartialEq)]
pub enum LineEvent {
    /// One line, without its terminator
    Line(String),
    /// The transport failed; no more lines follow
    Error(String),
    /// The transport reached end of input
    Eof,
}

/// Forward every line of `reader` to `tx` until end of input, a hard error,
/// a closed receiver or `running` going false.
///
/// Timeouts are retried without losing a partially read line.
pub fn pump_lines<R: BufRead>(mut reader: R, tx: &Sender<LineEvent>, running: &AtomicBool) {
    let mut buf = Vec::new();
    while running.load(Ordering::SeqCst) {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                if !buf.is_empty() {
                    let _ = tx.send(LineEvent::Line(decode(&buf)));
                }
                let _ = tx.send(LineEvent::Eof);
                return;
            }
            Ok(_) => {
                if buf.last() != Some(&b'\n') {
                    // unterminated tail, the next read reports EOF
                    continue;
                }
                let line = decode(&buf);
                buf.clear();
                if tx.send(LineEvent::Line(line)).is_err() {
                    return;
                }
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                tracing::error!("Feed read failed: {}", e);
                let _ = tx.send(LineEvent::Error(e.to_string()));
                return;
            }
        }
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(&['\r', '\n'][..])
        .to_string()
}

/// Open a blocking reader for a byte-stream transport.
pub fn open_reader(config: &SourceConfig) -> Result<Box<dyn BufRead + Send>> {
    match config {
        SourceConfig::Stdin => Ok(Box::new(BufReader::new(std::io::stdin()))),
        SourceConfig::Tcp { addr } => {
            let stream = TcpStream::connect(addr.as_str())
                .with_context(|| format!("connecting to {}", addr))?;
            stream.set_read_timeout(Some(READ_TIMEOUT))?;
            tracing::info!("Connected to {}", addr);
            Ok(Box::new(BufReader::new(stream)))
        }
        SourceConfig::Serial { port, baud } => {
            let serial = serialport::new(port.as_str(), *baud)
                .timeout(READ_TIMEOUT)
                .open()
                .with_context(|| format!("opening serial port {}", port))?;
            tracing::info!("Opened {} at {} baud", port, baud);
            Ok(Box::new(BufReader::new(serial)))
        }
        SourceConfig::Mock { .. } => Err(StreamScopeError::Source(
            "mock feed has no byte stream".to_string(),
        )),
    }
}

/// Start the reader thread for `config` and return its line channel.
pub fn spawn_source(config: &SourceConfig, running: Arc<AtomicBool>) -> Result<Receiver<LineEvent>> {
    let (tx, rx) = unbounded();

    match config {
        SourceConfig::Mock { rate_hz, channels } => {
            let feed = MockFeed::new(*channels);
            let period = mock_period(*rate_hz).ok_or_else(|| {
                StreamScopeError::Source(format!("unusable mock rate {} Hz", rate_hz))
            })?;
            std::thread::Builder::new()
                .name("feed-mock".into())
                .spawn(move || run_mock(feed, period, &tx, &running))?;
        }
        other => {
            let reader = open_reader(other)?;
            std::thread::Builder::new()
                .name("feed-reader".into())
                .spawn(move || pump_lines(reader, &tx, &running))?;
        }
    }

    tracing::debug!("Feed source started: {}", config.describe());
    Ok(rx)
}

fn run_mock(mut feed: MockFeed, period: Duration, tx: &Sender<LineEvent>, running: &AtomicBool) {
    let start = Instant::now();
    let mut next = start;
    while running.load(Ordering::SeqCst) {
        let line = feed.next_line(start.elapsed().as_secs_f64());
        if tx.send(LineEvent::Line(line)).is_err() {
            return;
        }
        next += period;
        let now = Instant::now();
        if next > now {
            std::thread::sleep(next - now);
        } else {
            next = now;
        }
    }
}
