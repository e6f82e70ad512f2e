// LogLens - app/state.rs
//
// Application state: the ingest controller, every open view, the file
// catalog, and the status shown to the user. Owned by the eframe::App
// implementation; every method runs on the UI thread.

use crate::app::catalog::FileCatalog;
use crate::app::ingest::IngestController;
use crate::app::session::{self, SessionData, SessionView};
use crate::app::view::{suggest_title, FileRemoval, LoadProgress, ViewRegistry};
use crate::core::model::{IngestEvent, ViewId};
use crate::core::parser::file_stem;
use crate::platform::config::AppConfig;
use crate::util::constants::MAX_WARNINGS;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

pub struct AppState {
    pub config: AppConfig,

    pub ingest: IngestController,

    pub views: ViewRegistry,

    pub catalog: FileCatalog,

    /// Open views in tab order.
    pub tab_order: Vec<ViewId>,

    /// Selected tab.
    pub current_view: Option<ViewId>,

    /// Ingest events received but not yet applied (per-frame budget).
    backlog: VecDeque<IngestEvent>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal problems, newest last.
    pub warnings: Vec<String>,

    /// Where the session is saved; `None` disables persistence.
    pub session_path: Option<PathBuf>,

    pub debug_mode: bool,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        ingest: IngestController,
        session_path: Option<PathBuf>,
        debug_mode: bool,
    ) -> Self {
        let views = ViewRegistry::new(config.page_size, config.paging_enabled);
        Self {
            config,
            ingest,
            views,
            catalog: FileCatalog::new(),
            tab_order: Vec::new(),
            current_view: None,
            backlog: VecDeque::new(),
            status_message: "Ready. Open log files via File \u{2192} Open.".to_string(),
            warnings: Vec::new(),
            session_path,
            debug_mode,
        }
    }

    // -------------------------------------------------------------------------
    // Opening and closing
    // -------------------------------------------------------------------------

    /// Open `paths` in a new tab titled after the first file.
    pub fn open_in_new_view(&mut self, paths: &[PathBuf]) -> Option<ViewId> {
        let first = paths.first()?;
        let id = self.views.create_view();
        let title = suggest_title(self.ingest.read_first_entry(first).as_ref(), first);
        if let Some(view) = self.views.get_mut(id) {
            view.set_title(title);
        }
        self.tab_order.push(id);
        self.current_view = Some(id);
        self.add_files(id, paths);
        Some(id)
    }

    /// Queue `paths` into view `id` and kick the queue.
    pub fn add_files(&mut self, id: ViewId, paths: &[PathBuf]) {
        let mut queued = 0usize;
        for path in paths {
            let Some(view) = self.views.get_mut(id) else {
                return;
            };
            if !view.add_file(path) {
                continue;
            }
            let app_name = self
                .ingest
                .read_first_entry(path)
                .map(|r| r.app_name)
                .unwrap_or_else(|| file_stem(path));
            self.catalog.file_added(id, path, &app_name);
            if self.ingest.enqueue(id, path) {
                queued += 1;
            }
        }
        if queued > 0 {
            self.status_message = format!("Loading {queued} file(s)...");
            self.ingest.start_next_if_idle(self.config.batch_size);
        }
    }

    /// Close a tab, cancelling its loads.
    pub fn close_view(&mut self, id: ViewId) {
        self.ingest.cancel_for_view(id);
        self.views.remove_view(id);
        self.forget_view(id);
    }

    /// Remove one file from a view, stopping its load if it is streaming.
    /// Closing the last file closes the view.
    pub fn remove_file(&mut self, id: ViewId, path: &Path) {
        self.ingest.cancel_target(id, path);
        match self.unlist_file(id, path) {
            FileRemoval::NotFound => {}
            FileRemoval::Removed => {
                self.status_message = format!("Removed {}", path.display());
            }
            FileRemoval::ViewClosed { title, .. } => {
                self.status_message = format!("Closed '{title}': no files left.");
            }
        }
    }

    /// Drop `path` from the catalog and from view `id`, tearing the view
    /// down when it was the last file.
    fn unlist_file(&mut self, id: ViewId, path: &Path) -> FileRemoval {
        self.catalog.file_removed(id, path);
        let removal = self.views.remove_file(id, path);
        if let FileRemoval::ViewClosed { view, .. } = &removal {
            self.ingest.cancel_for_view(*view);
            self.forget_view(*view);
        }
        removal
    }

    fn forget_view(&mut self, id: ViewId) {
        self.catalog.view_removed(id);
        let position = self.tab_order.iter().position(|v| *v == id);
        self.tab_order.retain(|v| *v != id);
        if self.current_view == Some(id) {
            self.current_view = position
                .and_then(|p| self.tab_order.get(p.saturating_sub(1)))
                .or(self.tab_order.first())
                .copied();
        }
    }

    /// Cancel whatever is loading into the current tab.
    pub fn cancel_current(&mut self) {
        if let Some(id) = self.current_view {
            self.ingest.cancel_for_view(id);
            if let Some(view) = self.views.get_mut(id) {
                view.clear_progress();
            }
            self.status_message = "Loading cancelled.".to_string();
        }
    }

    // -------------------------------------------------------------------------
    // Ingest events
    // -------------------------------------------------------------------------

    /// Pull events from the controller and apply at most `budget` of them.
    /// Returns true if anything was applied.
    pub fn pump_ingest(&mut self, budget: usize) -> bool {
        self.backlog.extend(self.ingest.poll());
        let mut applied = 0;
        while applied < budget {
            let Some(event) = self.backlog.pop_front() else {
                break;
            };
            self.apply_event(event);
            applied += 1;
        }
        applied > 0
    }

    /// True while events are queued or the controller has work.
    pub fn ingest_active(&self) -> bool {
        !self.backlog.is_empty() || self.ingest.is_busy()
    }

    fn apply_event(&mut self, event: IngestEvent) {
        let failed = match &event {
            IngestEvent::Error { view, path, .. } => Some((*view, path.clone())),
            _ => None,
        };
        match &event {
            IngestEvent::Error { path, message, .. } => {
                tracing::warn!(file = %path.display(), error = %message, "Load failed");
                self.status_message = format!("Failed to load {}", path.display());
                self.push_warning(message.clone());
            }
            IngestEvent::Finished { path, .. } => {
                self.status_message = format!("Loaded {}", path.display());
            }
            IngestEvent::Idle => {
                if !self.ingest.is_busy() {
                    let total: usize = self
                        .tab_order
                        .iter()
                        .filter_map(|id| self.views.get(*id))
                        .map(|v| v.records().len())
                        .sum();
                    self.status_message = format!("Ready: {total} records loaded.");
                    self.save_session();
                }
            }
            IngestEvent::Progress { .. } | IngestEvent::Batch { .. } => {}
        }
        self.views.apply_event(event);

        // A file that failed before producing anything is not kept.
        if let Some((id, path)) = failed {
            let empty = self
                .views
                .get(id)
                .is_some_and(|v| !v.has_records_from(&path));
            if empty {
                if let FileRemoval::ViewClosed { title, .. } = self.unlist_file(id, &path) {
                    self.status_message =
                        format!("Closed '{title}': {} could not be loaded.", path.display());
                }
            }
        }
    }

    /// The file currently streaming and its progress, with its view.
    pub fn active_progress(&self) -> Option<(ViewId, &LoadProgress)> {
        let id = self.ingest.active_view()?;
        self.views.get(id)?.progress().map(|p| (id, p))
    }

    pub fn push_warning(&mut self, warning: String) {
        if self.warnings.len() >= MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(warning);
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    pub fn session_data(&self) -> SessionData {
        let views = self
            .tab_order
            .iter()
            .filter(|id| self.views.contains(**id))
            .map(|id| SessionView {
                id: *id,
                snapshot: self.views.export_snapshot(*id),
            })
            .collect();
        SessionData::new(views, self.current_view)
    }

    /// Persist the session. Failures are logged; they never reach the user.
    pub fn save_session(&self) {
        let Some(path) = &self.session_path else {
            return;
        };
        if let Err(e) = session::save(&self.session_data(), path) {
            tracing::warn!(error = %e, "Failed to save session");
        }
    }

    /// Recreate the views of a saved session and queue their files.
    pub fn restore_session(&mut self, data: SessionData) {
        let mut remap: BTreeMap<ViewId, ViewId> = BTreeMap::new();
        for saved in data.views {
            let id = self.views.create_view();
            remap.insert(saved.id, id);
            self.views.import_snapshot(id, &saved.snapshot);
            self.tab_order.push(id);
            self.add_files(id, &saved.snapshot.loaded_files);
        }
        self.current_view = data
            .current_view
            .and_then(|old| remap.get(&old).copied())
            .or(self.tab_order.first().copied());
        tracing::info!(views = self.tab_order.len(), "Session restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::loader::{LoadingService, RetryPolicy};
    use crate::core::parser::Grammar;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn state(session_path: Option<PathBuf>) -> AppState {
        let config = AppConfig::default();
        let service = LoadingService::new(Arc::new(Grammar::default()), RetryPolicy::default());
        let ingest = IngestController::new(service, config.batch_size);
        AppState::new(config, ingest, session_path, false)
    }

    fn drain(state: &mut AppState) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while state.ingest_active() {
            assert!(Instant::now() < deadline, "ingest stalled");
            state.pump_ingest(usize::MAX);
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_open_titles_view_after_first_entry_app() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "api.log", "2024-01-15 10:00:00 INFO [Gateway] up\n");
        let mut state = state(None);
        let id = state.open_in_new_view(&[path]).unwrap();
        drain(&mut state);

        let view = state.views.get(id).unwrap();
        assert_eq!(view.title(), "Gateway");
        assert_eq!(view.records().len(), 1);
        assert_eq!(state.catalog.groups().next().map(|(app, _)| app), Some("Gateway"));
    }

    #[test]
    fn test_missing_only_file_warns_and_closes_its_tab() {
        let dir = TempDir::new().unwrap();
        let mut state = state(None);
        let id = state
            .open_in_new_view(&[dir.path().join("absent.log")])
            .unwrap();
        drain(&mut state);

        assert_eq!(state.warnings.len(), 1);
        assert!(state.warnings[0].contains("absent.log"));
        assert!(!state.views.contains(id));
        assert!(state.tab_order.is_empty());
        assert_eq!(state.current_view, None);
        assert_eq!(state.catalog.file_count(), 0);
    }

    #[test]
    fn test_missing_file_is_dropped_from_catalog_and_view() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.log", "2024-01-15 10:00:00 INFO a\n");
        let absent = dir.path().join("absent.log");
        let mut state = state(None);
        let id = state.open_in_new_view(&[a.clone(), absent]).unwrap();
        drain(&mut state);

        let view = state.views.get(id).unwrap();
        assert_eq!(view.loaded_files(), &[a]);
        assert_eq!(view.records().len(), 1);
        assert_eq!(state.catalog.file_count(), 1);
        assert_eq!(state.tab_order, vec![id]);
    }

    #[test]
    fn test_removing_streaming_file_then_readding_loads_it_once() {
        let dir = TempDir::new().unwrap();
        let body: String = (0..400)
            .map(|i| format!("2024-01-15 10:00:{:02} INFO row {i}\n", i % 60))
            .collect();
        let big = write(&dir, "big.log", &body);
        let small = write(&dir, "small.log", "2024-01-15 10:00:00 INFO small\n");
        let mut state = state(None);
        let id = state.open_in_new_view(&[big.clone(), small]).unwrap();
        assert_eq!(state.ingest.active_path(), Some(big.as_path()));

        state.remove_file(id, &big);
        assert_ne!(state.ingest.active_path(), Some(big.as_path()));
        state.add_files(id, &[big.clone()]);
        drain(&mut state);

        let view = state.views.get(id).unwrap();
        let rows: Vec<_> = view
            .records()
            .iter()
            .filter(|r| r.source_path == big)
            .map(|r| r.message.clone())
            .collect();
        let expected: Vec<_> = (0..400).map(|i| format!("row {i}")).collect();
        assert_eq!(rows, expected);
        assert_eq!(view.records().len(), 401);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn test_removing_last_file_closes_tab() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.log", "2024-01-15 10:00:00 INFO a\n");
        let mut state = state(None);
        let id = state.open_in_new_view(&[a.clone()]).unwrap();
        drain(&mut state);

        state.remove_file(id, &a);
        assert!(state.tab_order.is_empty());
        assert_eq!(state.current_view, None);
        assert_eq!(state.catalog.file_count(), 0);
    }

    #[test]
    fn test_session_restores_views_and_reloads_files() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.log", "2024-01-15 10:00:00 ERROR boom\n2024-01-15 10:00:01 INFO ok\n");
        let session_file = dir.path().join("session.json");

        let mut first = state(Some(session_file.clone()));
        let id = first.open_in_new_view(&[a]).unwrap();
        drain(&mut first);
        first.views.set_levels(id, ["error"]);
        first.save_session();

        let data = session::load(&session_file).unwrap();
        let mut second = state(None);
        second.restore_session(data);
        drain(&mut second);

        let restored = second.current_view.unwrap();
        let view = second.views.get(restored).unwrap();
        assert_eq!(view.records().len(), 2);
        assert_eq!(view.filtered_count(), 1);
    }
}
