// LogLens - app/loader.rs
//
// Loading service: validation, retry policy, and Idle bookkeeping around a
// single StreamWorker.
//
// Every external `load_async` request gets a fresh `RequestId` and ends
// with exactly one `Idle`, emitted after either a terminal `Error` or a
// `Finished` (never both). Transient worker errors are retried with a fixed
// delay; the delay is a deadline checked in `poll`, so the owning thread
// never sleeps. A retry resumes after the last batch already delivered.

use crate::app::queue::AsyncLoader;
use crate::app::worker::StreamWorker;
use crate::core::model::{LoaderEvent, Record, RequestId, WorkerEvent};
use crate::core::parser::LineParser;
use crate::platform::config::AppConfig;
use crate::platform::fs::{FileProbe, FsProbe};
use crate::util::constants::FIRST_ENTRY_PEEK_LINES;
use crate::util::error::LoadError;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often and how soon a failed stream is re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Retry state of the one in-flight request.
#[derive(Debug)]
struct ActiveLoad {
    request: RequestId,
    path: PathBuf,
    batch_size: usize,
    retry_count: u32,
    last_error: Option<String>,
    /// The current run reported an error; its trailing Finished is swallowed.
    run_failed: bool,
    retry_at: Option<Instant>,
    /// End offset of the last batch forwarded; retries start here.
    resume_offset: u64,
}

pub struct LoadingService {
    worker: StreamWorker,
    probe: Box<dyn FileProbe>,
    policy: RetryPolicy,
    active: Option<ActiveLoad>,
    outbox: VecDeque<LoaderEvent>,
    next_request: u64,
}

impl LoadingService {
    pub fn new(parser: Arc<dyn LineParser>, policy: RetryPolicy) -> Self {
        Self::with_probe(parser, policy, Box::new(FsProbe))
    }

    pub fn with_probe(
        parser: Arc<dyn LineParser>,
        policy: RetryPolicy,
        probe: Box<dyn FileProbe>,
    ) -> Self {
        Self {
            worker: StreamWorker::new(parser),
            probe,
            policy,
            active: None,
            outbox: VecDeque::new(),
            next_request: 0,
        }
    }

    /// Validate and parse the whole file on the calling thread.
    pub fn load_sync(&self, path: &Path) -> Result<Vec<Record>, LoadError> {
        self.probe.check(path)?;
        let records = self.worker.read_all(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!(file = %path.display(), records = records.len(), "Loaded synchronously");
        Ok(records)
    }

    /// Validate `path` and start streaming it.
    ///
    /// A validation failure queues `Error` then `Idle` for the next `poll`
    /// and leaves any worker state untouched.
    pub fn load_async(&mut self, path: &Path, batch_size: usize) -> RequestId {
        self.next_request += 1;
        let request = RequestId(self.next_request);

        if let Err(e) = self.probe.check(path) {
            tracing::warn!(file = %path.display(), error = %e, %request, "Validation failed; not loading");
            self.outbox.push_back(LoaderEvent::Error {
                request,
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            self.outbox.push_back(LoaderEvent::Idle { request });
            return request;
        }

        if let Some(previous) = &self.active {
            tracing::debug!(file = %previous.path.display(), "Superseding in-flight load");
        }

        self.active = Some(ActiveLoad {
            request,
            path: path.to_path_buf(),
            batch_size,
            retry_count: 0,
            last_error: None,
            run_failed: false,
            retry_at: None,
            resume_offset: 0,
        });
        self.worker.start(path.to_path_buf(), batch_size);
        request
    }

    /// Cancel the in-flight request.
    ///
    /// A running stream stops after its current line and finishes normally.
    /// A request waiting on a retry deadline is ended here.
    pub fn cancel_async(&mut self) {
        let waiting = self
            .active
            .as_ref()
            .is_some_and(|a| a.retry_at.is_some());
        if waiting {
            if let Some(active) = self.active.take() {
                tracing::info!(file = %active.path.display(), "Pending retry cancelled");
                let request = active.request;
                self.outbox.push_back(LoaderEvent::Finished {
                    request,
                    path: active.path,
                });
                self.outbox.push_back(LoaderEvent::Idle { request });
            }
            return;
        }
        self.worker.cancel();
    }

    /// Fire due retries and drain everything that happened since last call.
    pub fn poll(&mut self) -> Vec<LoaderEvent> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Vec<LoaderEvent> {
        for event in self.worker.poll_events() {
            self.handle_worker_event(event, now);
        }

        if let Some(active) = &mut self.active {
            if active.retry_at.is_some_and(|at| now >= at) {
                active.retry_at = None;
                active.run_failed = false;
                tracing::info!(
                    file = %active.path.display(),
                    attempt = active.retry_count,
                    max_retries = self.policy.max_retries,
                    offset = active.resume_offset,
                    "Retrying load"
                );
                self.worker
                    .start_from(active.path.clone(), active.batch_size, active.resume_offset);
            }
        }

        self.outbox.drain(..).collect()
    }

    fn handle_worker_event(&mut self, event: WorkerEvent, now: Instant) {
        let Some(active) = self.active.as_mut() else {
            tracing::trace!(?event, "Worker event with no active load dropped");
            return;
        };

        let path = match &event {
            WorkerEvent::Progress { path, .. }
            | WorkerEvent::Batch { path, .. }
            | WorkerEvent::Error { path, .. }
            | WorkerEvent::Finished { path } => path,
        };
        if *path != active.path {
            tracing::trace!(file = %path.display(), "Stale worker event dropped");
            return;
        }

        let request = active.request;
        match event {
            WorkerEvent::Progress {
                path,
                bytes_read,
                total,
            } => {
                if !active.run_failed {
                    self.outbox.push_back(LoaderEvent::Progress {
                        request,
                        path,
                        bytes_read,
                        total,
                    });
                }
            }
            WorkerEvent::Batch {
                path,
                records,
                end_offset,
            } => {
                active.resume_offset = end_offset;
                self.outbox.push_back(LoaderEvent::Batch {
                    request,
                    path,
                    records,
                });
            }
            WorkerEvent::Error { path, message } => {
                if active.retry_count < self.policy.max_retries {
                    active.retry_count += 1;
                    active.run_failed = true;
                    active.retry_at = Some(now + self.policy.retry_delay);
                    tracing::warn!(
                        file = %path.display(),
                        error = %message,
                        retry = active.retry_count,
                        delay_ms = self.policy.retry_delay.as_millis() as u64,
                        "Stream failed; retry scheduled"
                    );
                    active.last_error = Some(message);
                } else {
                    tracing::error!(
                        file = %path.display(),
                        error = %message,
                        retries = active.retry_count,
                        previous = active.last_error.as_deref().unwrap_or(""),
                        "Stream failed; giving up"
                    );
                    self.active = None;
                    self.outbox.push_back(LoaderEvent::Error {
                        request,
                        path,
                        message,
                    });
                    self.outbox.push_back(LoaderEvent::Idle { request });
                }
            }
            WorkerEvent::Finished { path } => {
                if active.run_failed {
                    return;
                }
                self.active = None;
                self.outbox.push_back(LoaderEvent::Finished { request, path });
                self.outbox.push_back(LoaderEvent::Idle { request });
            }
        }
    }

    /// First parseable record near the top of `path`.
    pub fn read_first_entry(&self, path: &Path) -> Option<Record> {
        self.worker.read_first_entry(path, FIRST_ENTRY_PEEK_LINES)
    }

    /// Stop listening to the worker and discard queued events. A running
    /// stream is left to `cancel_async`.
    pub fn detach(&mut self) {
        self.worker.detach();
        if let Some(active) = &mut self.active {
            active.retry_at = None;
        }
        self.outbox.clear();
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the in-flight request is waiting for a retry deadline.
    pub fn retry_pending(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.retry_at.is_some())
    }
}

impl AsyncLoader for LoadingService {
    fn load_async(&mut self, path: &Path, batch_size: usize) -> RequestId {
        LoadingService::load_async(self, path, batch_size)
    }

    fn cancel_async(&mut self) {
        LoadingService::cancel_async(self);
    }
}
