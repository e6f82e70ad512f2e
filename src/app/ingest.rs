// LogLens - app/ingest.rs
//
// Ingest controller: the single entry point the UI uses to load files.
//
// Binds a LoadQueue to a LoadingService and re-expresses the service's
// file-scoped events as view-scoped `IngestEvent`s. Each start records the
// request id the service handed out together with the target's view; only
// events carrying that id are forwarded. Events of a cancelled or
// superseded request are stale and dropped.
//
// Event handling in `poll`:
//   - Progress / Batch   -> forwarded with the request's view.
//   - Error / Finished   -> forwarded, then soft clear of the active slot.
//   - Idle               -> hard clear, start the next pending target with
//                           the previous batch size, then forward Idle.

use crate::app::loader::LoadingService;
use crate::app::queue::LoadQueue;
use crate::core::model::{IngestEvent, LoaderEvent, Record, RequestId, ViewId};
use crate::util::error::LoadError;
use std::path::{Path, PathBuf};

/// The request whose events are currently forwarded.
#[derive(Debug, Clone, Copy)]
struct InFlight {
    request: RequestId,
    view: ViewId,
}

pub struct IngestController {
    queue: LoadQueue,
    service: LoadingService,
    in_flight: Option<InFlight>,
    /// Batch size of the most recent start; reused when Idle advances.
    last_batch_size: usize,
    shutting_down: bool,
}

impl IngestController {
    pub fn new(service: LoadingService, batch_size: usize) -> Self {
        Self {
            queue: LoadQueue::new(),
            service,
            in_flight: None,
            last_batch_size: batch_size.max(1),
            shutting_down: false,
        }
    }

    /// Queue `path` for `view`. Does not start anything.
    pub fn enqueue(&mut self, view: ViewId, path: impl Into<PathBuf>) -> bool {
        if self.shutting_down {
            return false;
        }
        self.queue.enqueue(view, path)
    }

    /// Start the next pending target if no attempt is active.
    pub fn start_next_if_idle(&mut self, batch_size: usize) -> bool {
        if self.shutting_down {
            return false;
        }
        let batch_size = batch_size.max(1);
        let started = self.try_start(batch_size);
        if started {
            self.last_batch_size = batch_size;
        }
        started
    }

    fn try_start(&mut self, batch_size: usize) -> bool {
        if !self.queue.try_start_next(&mut self.service, batch_size) {
            return false;
        }
        self.in_flight = self
            .queue
            .active_request()
            .zip(self.queue.active_view())
            .map(|(request, view)| InFlight { request, view });
        true
    }

    /// Cancel `view`'s active load and drop its pending loads. Other views'
    /// targets start straight away.
    pub fn cancel_for_view(&mut self, view: ViewId) {
        if self.shutting_down {
            return;
        }
        if self.in_flight.is_some_and(|f| f.view == view) {
            self.in_flight = None;
        }
        self.queue.cancel_if_active(view, &mut self.service);
        self.try_start(self.last_batch_size);
    }

    /// Cancel the load of one file in `view` without touching the view's
    /// other targets. The pair may be enqueued again immediately.
    pub fn cancel_target(&mut self, view: ViewId, path: &Path) {
        if self.shutting_down {
            return;
        }
        if self.queue.cancel_target(view, path, &mut self.service) {
            self.in_flight = None;
            self.try_start(self.last_batch_size);
        }
    }

    pub fn load_sync(&self, path: &Path) -> Result<Vec<Record>, LoadError> {
        self.service.load_sync(path)
    }

    pub fn read_first_entry(&self, path: &Path) -> Option<Record> {
        self.service.read_first_entry(path)
    }

    /// Drain pending service events as view-scoped events.
    pub fn poll(&mut self) -> Vec<IngestEvent> {
        if self.shutting_down {
            return Vec::new();
        }

        let mut out = Vec::new();
        for event in self.service.poll() {
            let request = event.request();
            let Some(view) = self.view_for(request) else {
                tracing::trace!(%request, "Event of a stale request dropped");
                continue;
            };
            match event {
                LoaderEvent::Progress {
                    path,
                    bytes_read,
                    total,
                    ..
                } => out.push(IngestEvent::Progress {
                    view,
                    path,
                    bytes_read,
                    total,
                }),
                LoaderEvent::Batch { path, records, .. } => out.push(IngestEvent::Batch {
                    view,
                    path,
                    records,
                }),
                LoaderEvent::Error { path, message, .. } => {
                    self.queue.clear_active_if(&path);
                    out.push(IngestEvent::Error {
                        view,
                        path,
                        message,
                    });
                }
                LoaderEvent::Finished { path, .. } => {
                    self.queue.clear_active_if(&path);
                    out.push(IngestEvent::Finished { view, path });
                }
                LoaderEvent::Idle { .. } => {
                    self.in_flight = None;
                    self.queue.clear_active();
                    self.try_start(self.last_batch_size);
                    out.push(IngestEvent::Idle);
                }
            }
        }
        out
    }

    fn view_for(&self, request: RequestId) -> Option<ViewId> {
        self.in_flight
            .filter(|f| f.request == request)
            .map(|f| f.view)
    }

    /// Stop forwarding, detach from the service, then cancel the
    /// outstanding attempt. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shutting_down {
            return;
        }
        self.shutting_down = true;
        self.in_flight = None;
        self.service.detach();
        if let Some(view) = self.queue.active_view() {
            self.queue.cancel_if_active(view, &mut self.service);
        }
        tracing::debug!(
            dropped_pending = self.queue.pending_count(),
            "Ingest controller shut down"
        );
    }

    /// Whether anything is loading, retrying, or waiting to load.
    pub fn is_busy(&self) -> bool {
        !self.shutting_down
            && (self.queue.is_active() || self.queue.pending_count() > 0 || self.service.is_busy())
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.queue.active_view()
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.queue.active_path()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn retry_pending(&self) -> bool {
        self.service.retry_pending()
    }
}

impl Drop for IngestController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
