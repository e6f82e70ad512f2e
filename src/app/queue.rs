// LogLens - app/queue.rs
//
// Single-flight scheduler over (view, path) pairs.
//
// State: one pending FIFO plus at most one active attempt. The queue never
// reads files; it asks an `AsyncLoader` to start or cancel work and is told
// by its owner when the attempt is over.
//
// Clearing comes in two strengths:
//   - `clear_active_if(path)`: soft clear on a terminal Error/Finished for
//     the tracked file. Late events for that path are then ignored.
//   - `clear_active()`: hard clear on Idle. The only point at which it is
//     safe to start the next pending target.
//
// Cancelling (by view or by exact target) also clears the slot, since the
// owner stops listening to the cancelled request.

use crate::core::model::{FileTarget, RequestId, ViewId};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// The loading operations the queue drives.
pub trait AsyncLoader {
    /// Begin streaming `path` in batches of `batch_size`. Returns the id
    /// that tags every event of this request.
    fn load_async(&mut self, path: &Path, batch_size: usize) -> RequestId;

    /// Cancel the in-flight stream, if any.
    fn cancel_async(&mut self);
}

#[derive(Debug, Clone)]
struct ActiveSlot {
    target: FileTarget,
    batch_size: usize,
    request: RequestId,
}

#[derive(Debug, Default)]
pub struct LoadQueue {
    pending: VecDeque<FileTarget>,
    active: Option<ActiveSlot>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `path` for `view`. Returns `false` if the pair is already
    /// pending or active.
    pub fn enqueue(&mut self, view: ViewId, path: impl Into<PathBuf>) -> bool {
        let target = FileTarget::new(view, path);
        let is_active = self.active.as_ref().is_some_and(|a| a.target == target);
        if is_active || self.pending.contains(&target) {
            tracing::debug!(%view, file = %target.path.display(), "Duplicate enqueue ignored");
            return false;
        }
        tracing::debug!(
            %view,
            file = %target.path.display(),
            pending = self.pending.len() + 1,
            "Enqueued"
        );
        self.pending.push_back(target);
        true
    }

    /// Start the head of the pending FIFO if nothing is active.
    pub fn try_start_next(&mut self, loader: &mut dyn AsyncLoader, batch_size: usize) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(target) = self.pending.pop_front() else {
            return false;
        };

        tracing::info!(
            view = %target.view,
            file = %target.path.display(),
            batch_size,
            remaining = self.pending.len(),
            "Starting load"
        );
        let request = loader.load_async(&target.path, batch_size);
        self.active = Some(ActiveSlot {
            target,
            batch_size,
            request,
        });
        true
    }

    /// Cancel the active attempt if it belongs to `view`, and drop every
    /// pending entry for `view` either way.
    pub fn cancel_if_active(&mut self, view: ViewId, loader: &mut dyn AsyncLoader) {
        if self.active_view() == Some(view) {
            tracing::info!(%view, "Cancelling active load");
            loader.cancel_async();
            self.active = None;
        }
        let before = self.pending.len();
        self.pending.retain(|t| t.view != view);
        if before != self.pending.len() {
            tracing::debug!(%view, purged = before - self.pending.len(), "Purged pending loads");
        }
    }

    /// Cancel the active attempt if it is exactly `(view, path)`, and drop a
    /// pending entry for the same pair. Other targets of `view` are kept.
    /// Returns true if the active attempt was cancelled.
    pub fn cancel_target(&mut self, view: ViewId, path: &Path, loader: &mut dyn AsyncLoader) -> bool {
        let target = FileTarget::new(view, path);
        self.pending.retain(|t| *t != target);
        if self.active.as_ref().is_some_and(|a| a.target == target) {
            tracing::info!(%view, file = %path.display(), "Cancelling active load of removed file");
            loader.cancel_async();
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Soft clear: forget the active attempt if it is for `path`.
    pub fn clear_active_if(&mut self, path: &Path) -> bool {
        if self.active_path() == Some(path) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Hard clear.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.active.as_ref().map(|a| a.target.view)
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.target.path.as_path())
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.active.as_ref().map(|a| a.request)
    }

    pub fn active_batch_size(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.batch_size)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, view: ViewId, path: &Path) -> bool {
        self.pending
            .iter()
            .any(|t| t.view == view && t.path == path)
    }
}
