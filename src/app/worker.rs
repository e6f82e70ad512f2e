// LogLens - app/worker.rs
//
// Incremental file streaming on a background thread.
//
// Architecture:
//   - `StreamWorker` lives on the UI thread; `run_stream` runs on a
//     background thread, one thread per run.
//   - The completion sink (an mpsc `Sender<WorkerEvent>`) is handed to the
//     thread at start time; nothing but event values crosses the boundary.
//   - An `Arc<AtomicBool>` cancel flag is polled once per line.
//   - Starting a new run replaces the channel, so events from a superseded
//     run are dropped with the old receiver.
//   - A run may start at a byte offset. Each Batch reports the offset just
//     past its last line, so a later run can resume without re-sending.
//
// Terminal sequences per run:
//   - open failure:          Error, Finished   (no Progress)
//   - completed:             ..., Progress(total, total), Finished
//   - cancelled mid-stream:  ..., Batch(partial), Finished
//   - read failure:          ..., Batch(partial), Error, Finished
//
// The worker never retries; that policy belongs to the loading service.

use crate::core::model::{Record, WorkerEvent};
use crate::core::parser::LineParser;
use crate::platform::fs::{read_first_lines, trim_line_ending};
use crate::util::constants::PROGRESS_STEP_BYTES;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

// =============================================================================
// Cancel handle
// =============================================================================

/// Cloneable, thread-safe cancellation request for one run.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Ask the run to stop after the current line. Never blocks.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// StreamWorker
// =============================================================================

/// Streams one file at a time on a background thread.
pub struct StreamWorker {
    parser: Arc<dyn LineParser>,

    /// Receiver for the current run's events.
    events_rx: Option<mpsc::Receiver<WorkerEvent>>,

    /// Cancel flag shared with the current run's thread.
    cancel: Option<CancelHandle>,
}

impl StreamWorker {
    pub fn new(parser: Arc<dyn LineParser>) -> Self {
        Self {
            parser,
            events_rx: None,
            cancel: None,
        }
    }

    /// Start streaming `path`, delivering events to the worker's own channel
    /// (drained with `poll_events`). Any previous run is cancelled and its
    /// channel dropped.
    pub fn start(&mut self, path: PathBuf, batch_size: usize) {
        self.start_from(path, batch_size, 0);
    }

    /// Like `start`, but skip the first `offset` bytes of the file.
    pub fn start_from(&mut self, path: PathBuf, batch_size: usize, offset: u64) {
        self.cancel();
        let (tx, rx) = mpsc::channel();
        self.events_rx = Some(rx);
        let handle = self.start_with_sink(path, batch_size, offset, tx);
        self.cancel = Some(handle);
    }

    /// Start streaming `path` from `offset` into a caller-provided sink.
    /// Returns the handle that cancels this run.
    pub fn start_with_sink(
        &self,
        path: PathBuf,
        batch_size: usize,
        offset: u64,
        sink: mpsc::Sender<WorkerEvent>,
    ) -> CancelHandle {
        let flag = Arc::new(AtomicBool::new(false));
        let handle = CancelHandle(Arc::clone(&flag));
        let parser = Arc::clone(&self.parser);

        tracing::debug!(file = %path.display(), batch_size, offset, "Stream worker starting");
        std::thread::spawn(move || {
            run_stream(path, batch_size, offset, parser.as_ref(), sink, flag);
        });

        handle
    }

    /// Request cancellation of the current run. Safe to call at any time;
    /// the run still flushes its partial batch and sends `Finished`.
    pub fn cancel(&self) {
        if let Some(handle) = &self.cancel {
            handle.cancel();
        }
    }

    /// Handle for cancelling the current run from another context.
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        self.cancel.clone()
    }

    /// Stop listening to the current run. The run keeps going until
    /// cancelled; its events are discarded.
    pub fn detach(&mut self) {
        self.events_rx = None;
    }

    /// Drain all events currently queued by the running thread.
    pub fn poll_events(&self) -> Vec<WorkerEvent> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.events_rx {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }

    /// Parse the whole file on the calling thread.
    pub fn read_all(&self, path: &Path) -> io::Result<Vec<Record>> {
        read_all(path, self.parser.as_ref())
    }

    /// First parseable record within `max_lines` lines, if any.
    pub fn read_first_entry(&self, path: &Path, max_lines: usize) -> Option<Record> {
        let lines = match read_first_lines(path, max_lines) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "Cannot peek file");
                return None;
            }
        };
        lines
            .iter()
            .find_map(|line| self.parser.parse_line(line, path))
    }
}

// =============================================================================
// Background stream loop
// =============================================================================

enum Outcome {
    Completed,
    Cancelled,
    Failed(io::Error),
}

/// Read `path` line by line from `start_offset`, sending batches and
/// progress to `sink`.
///
/// Runs on a background thread. Returns quietly if the receiver is dropped.
fn run_stream(
    path: PathBuf,
    batch_size: usize,
    start_offset: u64,
    parser: &dyn LineParser,
    sink: mpsc::Sender<WorkerEvent>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if sink.send($msg).is_err() {
                return; // Receiver dropped (superseded or shut down); exit quietly.
            }
        };
    }

    let batch_size = batch_size.max(1);

    let opened = std::fs::File::open(&path).and_then(|mut f| {
        if start_offset > 0 {
            f.seek(SeekFrom::Start(start_offset))?;
        }
        Ok(f)
    });
    let file = match opened {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Stream worker cannot open file");
            send!(WorkerEvent::Error {
                path: path.clone(),
                message: format!("Cannot open '{}': {e}", path.display()),
            });
            send!(WorkerEvent::Finished { path });
            return;
        }
    };

    let total = file.metadata().map(|m| m.len()).unwrap_or(0);
    send!(WorkerEvent::Progress {
        path: path.clone(),
        bytes_read: start_offset.min(total),
        total,
    });

    let mut reader = BufReader::new(file);
    let mut batch: Vec<Record> = Vec::with_capacity(batch_size);
    let mut buf: Vec<u8> = Vec::new();
    let mut bytes_read: u64 = start_offset;
    let mut last_reported: u64 = start_offset;
    let mut records_sent: usize = 0;

    let outcome = loop {
        if cancel.load(Ordering::SeqCst) {
            break Outcome::Cancelled;
        }

        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break Outcome::Completed,
            Ok(n) => {
                bytes_read += n as u64;
                let line = String::from_utf8_lossy(&buf);
                if let Some(record) = parser.parse_line(trim_line_ending(&line), &path) {
                    batch.push(record);
                    if batch.len() >= batch_size {
                        records_sent += batch.len();
                        let full = std::mem::replace(&mut batch, Vec::with_capacity(batch_size));
                        send!(WorkerEvent::Batch {
                            path: path.clone(),
                            records: full,
                            end_offset: bytes_read,
                        });
                    }
                }
                if bytes_read - last_reported >= PROGRESS_STEP_BYTES {
                    last_reported = bytes_read;
                    send!(WorkerEvent::Progress {
                        path: path.clone(),
                        bytes_read: bytes_read.min(total),
                        total,
                    });
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Outcome::Failed(e),
        }
    };

    // The remainder is flushed whatever the outcome.
    if !batch.is_empty() {
        records_sent += batch.len();
        send!(WorkerEvent::Batch {
            path: path.clone(),
            records: batch,
            end_offset: bytes_read,
        });
    }

    match outcome {
        Outcome::Completed => {
            send!(WorkerEvent::Progress {
                path: path.clone(),
                bytes_read: total,
                total,
            });
            tracing::info!(file = %path.display(), records = records_sent, "Stream complete");
        }
        Outcome::Cancelled => {
            tracing::info!(
                file = %path.display(),
                records = records_sent,
                bytes_read,
                "Stream cancelled"
            );
        }
        Outcome::Failed(e) => {
            tracing::warn!(file = %path.display(), error = %e, bytes_read, "Stream read failed");
            send!(WorkerEvent::Error {
                path: path.clone(),
                message: format!("Read error in '{}': {e}", path.display()),
            });
        }
    }

    send!(WorkerEvent::Finished { path });
}

/// Parse every line of `path` synchronously.
fn read_all(path: &Path, parser: &dyn LineParser) -> io::Result<Vec<Record>> {
    let mut reader = BufReader::new(std::fs::File::open(path)?);
    let mut records = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if let Some(record) = parser.parse_line(trim_line_ending(&line), path) {
            records.push(record);
        }
    }
    Ok(records)
}
