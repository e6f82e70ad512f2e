// LogLens - app/view.rs
//
// Views (tabs): each one owns its records and its presentation chain
//
//   records -> FilterSortProxy -> PagingProxy
//
// and the registry that owns every view, routes view-scoped ingest events,
// and exposes the per-view filter API. Operations on an unknown view id are
// tolerated: mutations do nothing and queries return defaults, because a
// view may be closed while events for it are still in flight.

use crate::core::filter::{level_counts, FilterState, FilterSortProxy};
use crate::core::model::{Column, HighlightRange, IngestEvent, Record, SearchField, SortOrder, ViewId};
use crate::core::paging::PagingProxy;
use crate::core::parser::file_stem;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

// =============================================================================
// Snapshot
// =============================================================================

/// Persistable settings of one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSnapshot {
    pub loaded_files: Vec<PathBuf>,
    pub filter: FilterState,
    pub page_size: usize,
    pub current_page: usize,
    pub sort_column: Option<Column>,
    pub sort_order: SortOrder,
    pub title: String,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            loaded_files: Vec::new(),
            filter: FilterState::default(),
            page_size: crate::util::constants::DEFAULT_PAGE_SIZE,
            current_page: 1,
            sort_column: None,
            sort_order: SortOrder::Ascending,
            title: String::new(),
        }
    }
}

/// Bytes read so far for the file a view is currently receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    pub path: PathBuf,
    pub bytes_read: u64,
    pub total: u64,
}

impl LoadProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.bytes_read as f64 / self.total as f64) as f32
        }
    }
}

/// Tab title for a view opened on `path`: the application name of its first
/// entry, else the file stem.
pub fn suggest_title(first_entry: Option<&Record>, path: &Path) -> String {
    match first_entry {
        Some(record) if !record.app_name.trim().is_empty() => record.app_name.trim().to_string(),
        _ => file_stem(path),
    }
}

// =============================================================================
// ViewContext
// =============================================================================

#[derive(Debug)]
pub struct ViewContext {
    id: ViewId,
    title: String,
    records: Vec<Record>,
    /// Files in the order they were added.
    loaded_files: Vec<PathBuf>,
    proxy: FilterSortProxy,
    paging: PagingProxy,
    /// Page requested by a restored snapshot, applied once enough rows exist.
    restore_page: Option<usize>,
    progress: Option<LoadProgress>,
    last_error: Option<String>,
}

impl ViewContext {
    pub fn new(id: ViewId, page_size: usize, paging_enabled: bool) -> Self {
        let mut paging = PagingProxy::new(page_size);
        paging.set_enabled(paging_enabled);
        Self {
            id,
            title: id.to_string(),
            records: Vec::new(),
            loaded_files: Vec::new(),
            proxy: FilterSortProxy::new(),
            paging,
            restore_page: None,
            progress: None,
            last_error: None,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    pub fn filter_state(&self) -> &FilterState {
        self.proxy.filter_state()
    }

    pub fn proxy(&self) -> &FilterSortProxy {
        &self.proxy
    }

    pub fn paging(&self) -> &PagingProxy {
        &self.paging
    }

    pub fn progress(&self) -> Option<&LoadProgress> {
        self.progress.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Register `path` as part of this view. Returns false if already present.
    pub fn add_file(&mut self, path: &Path) -> bool {
        if self.loaded_files.iter().any(|p| p == path) {
            return false;
        }
        self.loaded_files.push(path.to_path_buf());
        true
    }

    /// Append a batch and fold it into the row mapping.
    pub fn append_records(&mut self, batch: Vec<Record>) {
        if batch.is_empty() {
            return;
        }
        let first_new = self.records.len();
        self.records.extend(batch);
        self.proxy.append(&self.records, first_new);
        self.sync_paging();
    }

    /// Whether any loaded record came from `path`.
    pub fn has_records_from(&self, path: &Path) -> bool {
        self.records.iter().any(|r| r.source_path == path)
    }

    pub fn clear_progress(&mut self) {
        self.progress = None;
    }

    /// Drop `path` and its records. Returns false if the file was not loaded.
    pub fn remove_file(&mut self, path: &Path) -> bool {
        let before = self.loaded_files.len();
        self.loaded_files.retain(|p| p != path);
        if self.loaded_files.len() == before {
            return false;
        }
        self.records.retain(|r| r.source_path != path);
        if self.progress.as_ref().is_some_and(|p| p.path == path) {
            self.progress = None;
        }

        let mut state = self.proxy.filter_state().clone();
        state.hidden.remove(path);
        if state.show_only.as_deref() == Some(path) {
            state.show_only = None;
        }
        self.proxy.set_filter_state(state);
        self.refilter();
        true
    }

    /// Rebuild the row mapping after a filter change.
    fn refilter(&mut self) {
        self.proxy.invalidate(&self.records);
        self.sync_paging();
    }

    fn sync_paging(&mut self) {
        self.paging.set_source_count(self.proxy.row_count());
        if let Some(page) = self.restore_page {
            self.paging.set_page(page);
            if self.paging.current_page() == page {
                self.restore_page = None;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Rows visible on the current page.
    pub fn row_count(&self) -> usize {
        self.paging.row_count()
    }

    /// Rows passing the filter across all pages.
    pub fn filtered_count(&self) -> usize {
        self.proxy.row_count()
    }

    fn source_index(&self, row: usize) -> Option<usize> {
        self.paging
            .map_to_source(row)
            .and_then(|r| self.proxy.source_row(r))
    }

    /// Record at page row `row`.
    pub fn record_at(&self, row: usize) -> Option<&Record> {
        self.source_index(row).and_then(|i| self.records.get(i))
    }

    /// Search highlights for page row `row`.
    pub fn highlight_ranges(&mut self, row: usize, column: Column) -> &[HighlightRange] {
        match self.source_index(row) {
            Some(index) => self.proxy.highlight_ranges(&self.records, index, column),
            None => &[],
        }
    }

    pub fn level_counts(&self) -> BTreeMap<String, usize> {
        level_counts(&self.records)
    }

    // -------------------------------------------------------------------------
    // Sorting and paging
    // -------------------------------------------------------------------------

    pub fn sort(&mut self, column: Column, order: SortOrder) {
        self.paging.sort(&mut self.proxy, &self.records, column, order);
    }

    /// Header click: sort ascending by a new column, or flip the order.
    pub fn toggle_sort(&mut self, column: Column) {
        let order = match self.proxy.sort_state() {
            Some((current, order)) if current == column => order.toggled(),
            _ => SortOrder::Ascending,
        };
        self.sort(column, order);
    }

    pub fn set_page(&mut self, page: usize) {
        self.restore_page = None;
        self.paging.set_page(page);
    }

    pub fn next_page(&mut self) {
        self.restore_page = None;
        self.paging.next_page();
    }

    pub fn prev_page(&mut self) {
        self.restore_page = None;
        self.paging.prev_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.paging.set_page_size(page_size);
    }

    pub fn set_paging_enabled(&mut self, enabled: bool) {
        self.paging.set_enabled(enabled);
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> ViewSnapshot {
        let (sort_column, sort_order) = match self.proxy.sort_state() {
            Some((column, order)) => (Some(column), order),
            None => (None, SortOrder::Ascending),
        };
        ViewSnapshot {
            loaded_files: self.loaded_files.clone(),
            filter: self.proxy.filter_state().clone(),
            page_size: self.paging.page_size(),
            current_page: self
                .restore_page
                .unwrap_or_else(|| self.paging.current_page()),
            sort_column,
            sort_order,
            title: self.title.clone(),
        }
    }

    /// Apply a snapshot's filter, sort, paging, and title. Files are not
    /// loaded here; the caller enqueues `snapshot.loaded_files`.
    pub fn apply_snapshot(&mut self, snapshot: &ViewSnapshot) {
        self.proxy.set_filter_state(snapshot.filter.clone());
        self.paging.set_page_size(snapshot.page_size);
        match snapshot.sort_column {
            Some(column) => self.proxy.sort(&self.records, column, snapshot.sort_order),
            None => self.proxy.clear_sort(&self.records),
        }
        if !snapshot.title.is_empty() {
            self.title = snapshot.title.clone();
        }
        self.restore_page = Some(snapshot.current_page.max(1));
        self.refilter();
    }
}

// =============================================================================
// ViewRegistry
// =============================================================================

/// Result of removing a file from a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRemoval {
    /// The view or the file was unknown.
    NotFound,
    /// The file was removed; the view still has other files.
    Removed,
    /// The file was the view's last one and the view was closed.
    ViewClosed { view: ViewId, title: String },
}

#[derive(Debug)]
pub struct ViewRegistry {
    views: BTreeMap<ViewId, ViewContext>,
    next_id: u64,
    page_size: usize,
    paging_enabled: bool,
}

impl ViewRegistry {
    pub fn new(page_size: usize, paging_enabled: bool) -> Self {
        Self {
            views: BTreeMap::new(),
            next_id: 1,
            page_size,
            paging_enabled,
        }
    }

    /// Open a new, empty view.
    pub fn create_view(&mut self) -> ViewId {
        let id = ViewId(self.next_id);
        self.ensure_view(id);
        id
    }

    /// Return the view `id`, creating it empty if needed.
    pub fn ensure_view(&mut self, id: ViewId) -> &mut ViewContext {
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        let (page_size, paging_enabled) = (self.page_size, self.paging_enabled);
        self.views.entry(id).or_insert_with(|| {
            tracing::debug!(view = %id, "View created");
            ViewContext::new(id, page_size, paging_enabled)
        })
    }

    pub fn remove_view(&mut self, id: ViewId) -> Option<ViewContext> {
        let removed = self.views.remove(&id);
        if removed.is_some() {
            tracing::debug!(view = %id, "View removed");
        }
        removed
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewContext> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewContext> {
        self.views.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<ViewId> {
        self.views.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Remove `path` from `id`. Removing the last file closes the view.
    pub fn remove_file(&mut self, id: ViewId, path: &Path) -> FileRemoval {
        let Some(view) = self.views.get_mut(&id) else {
            return FileRemoval::NotFound;
        };
        if !view.remove_file(path) {
            return FileRemoval::NotFound;
        }
        if !view.loaded_files.is_empty() {
            return FileRemoval::Removed;
        }
        let title = view.title.clone();
        self.views.remove(&id);
        tracing::info!(view = %id, %title, "Last file removed; view closed");
        FileRemoval::ViewClosed { view: id, title }
    }

    // -------------------------------------------------------------------------
    // Ingest routing
    // -------------------------------------------------------------------------

    /// Apply one view-scoped ingest event. Events for unknown views are
    /// dropped.
    pub fn apply_event(&mut self, event: IngestEvent) {
        match event {
            IngestEvent::Progress {
                view,
                path,
                bytes_read,
                total,
            } => {
                if let Some(v) = self.views.get_mut(&view) {
                    v.progress = Some(LoadProgress {
                        path,
                        bytes_read,
                        total,
                    });
                }
            }
            IngestEvent::Batch {
                view,
                path,
                records,
            } => match self.views.get_mut(&view) {
                Some(v) if v.loaded_files.contains(&path) => v.append_records(records),
                Some(_) => {
                    tracing::debug!(%view, file = %path.display(), "Batch for removed file dropped");
                }
                None => {
                    tracing::debug!(%view, file = %path.display(), "Batch for missing view dropped");
                }
            },
            IngestEvent::Error {
                view,
                path,
                message,
            } => {
                if let Some(v) = self.views.get_mut(&view) {
                    tracing::debug!(%view, file = %path.display(), "Load error recorded");
                    v.progress = None;
                    v.last_error = Some(message);
                }
            }
            IngestEvent::Finished { view, .. } => {
                if let Some(v) = self.views.get_mut(&view) {
                    v.progress = None;
                }
            }
            IngestEvent::Idle => {}
        }
    }

    // -------------------------------------------------------------------------
    // Filter API
    // -------------------------------------------------------------------------

    fn mutate(&mut self, id: ViewId, f: impl FnOnce(&mut ViewContext)) {
        if let Some(view) = self.views.get_mut(&id) {
            f(view);
            view.refilter();
        }
    }

    pub fn app_filter(&self, id: ViewId) -> String {
        self.get(id)
            .map(|v| v.filter_state().app_filter.clone())
            .unwrap_or_default()
    }

    pub fn set_app_filter(&mut self, id: ViewId, app: &str) {
        self.mutate(id, |v| v.proxy.set_app_filter(app));
    }

    pub fn levels(&self, id: ViewId) -> BTreeSet<String> {
        self.get(id)
            .map(|v| v.filter_state().levels.clone())
            .unwrap_or_default()
    }

    pub fn set_levels<I, S>(&mut self, id: ViewId, levels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutate(id, |v| v.proxy.set_levels(levels));
    }

    /// Current search as `(text, field, is_regex)`.
    pub fn search(&self, id: ViewId) -> (String, SearchField, bool) {
        self.get(id)
            .map(|v| {
                let s = v.filter_state();
                (s.search_text.clone(), s.search_field, s.search_regex)
            })
            .unwrap_or_default()
    }

    pub fn set_search(&mut self, id: ViewId, text: &str, field: SearchField, is_regex: bool) {
        self.mutate(id, |v| v.proxy.set_search(text, field, is_regex));
    }

    /// Display text of the current search pattern error, if any.
    pub fn search_error(&self, id: ViewId) -> Option<String> {
        self.get(id)
            .and_then(|v| v.proxy.search_error())
            .map(|e| e.to_string())
    }

    pub fn show_only(&self, id: ViewId) -> Option<PathBuf> {
        self.get(id).and_then(|v| v.filter_state().show_only.clone())
    }

    pub fn set_show_only(&mut self, id: ViewId, path: Option<PathBuf>) {
        self.mutate(id, |v| v.proxy.set_show_only(path));
    }

    pub fn hidden(&self, id: ViewId) -> BTreeSet<PathBuf> {
        self.get(id)
            .map(|v| v.filter_state().hidden.clone())
            .unwrap_or_default()
    }

    pub fn hide(&mut self, id: ViewId, path: &Path) {
        self.mutate(id, |v| v.proxy.hide(path));
    }

    pub fn unhide(&mut self, id: ViewId, path: &Path) {
        self.mutate(id, |v| v.proxy.unhide(path));
    }

    pub fn set_hidden(&mut self, id: ViewId, hidden: BTreeSet<PathBuf>) {
        self.mutate(id, |v| v.proxy.set_hidden(hidden));
    }

    pub fn level_counts(&self, id: ViewId) -> BTreeMap<String, usize> {
        self.get(id).map(|v| v.level_counts()).unwrap_or_default()
    }

    /// Flip the visibility of `path` within a view.
    ///
    /// - `path` is the show-only target: show-only is cleared and every
    ///   loaded file is hidden.
    /// - show-only targets another file: show-only is cleared and every
    ///   file except `path` and the former target is hidden.
    /// - otherwise `path` moves in or out of the hidden set.
    pub fn toggle_visibility(&mut self, id: ViewId, path: &Path) {
        self.mutate(id, |v| {
            let show_only = v.filter_state().show_only.clone();
            match show_only {
                Some(target) if target == path => {
                    v.proxy.set_show_only(None);
                    v.proxy.set_hidden(v.loaded_files.iter().cloned().collect());
                }
                Some(target) => {
                    let hidden = v
                        .loaded_files
                        .iter()
                        .filter(|p| p.as_path() != path && **p != target)
                        .cloned()
                        .collect();
                    v.proxy.set_show_only(None);
                    v.proxy.set_hidden(hidden);
                }
                None => {
                    if v.filter_state().hidden.contains(path) {
                        v.proxy.unhide(path);
                    } else {
                        v.proxy.hide(path);
                    }
                }
            }
        });
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    pub fn export_snapshot(&self, id: ViewId) -> ViewSnapshot {
        self.get(id).map(|v| v.snapshot()).unwrap_or_default()
    }

    pub fn import_snapshot(&mut self, id: ViewId, snapshot: &ViewSnapshot) {
        if let Some(view) = self.views.get_mut(&id) {
            view.apply_snapshot(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(path: &str, level: &str, app: &str, message: &str) -> Record {
        Record {
            timestamp: "2024-01-15 10:00:00".to_string(),
            level: level.to_string(),
            message: message.to_string(),
            app_name: app.to_string(),
            source_path: PathBuf::from(path),
        }
    }

    fn batch(view: ViewId, path: &str, records: Vec<Record>) -> IngestEvent {
        IngestEvent::Batch {
            view,
            path: PathBuf::from(path),
            records,
        }
    }

    /// View 1 with three files, two records each.
    fn three_file_view() -> (ViewRegistry, ViewId) {
        let mut registry = ViewRegistry::new(100, true);
        let id = registry.create_view();
        for file in ["a.log", "b.log", "c.log"] {
            registry.get_mut(id).unwrap().add_file(Path::new(file));
            registry.apply_event(batch(
                id,
                file,
                vec![rec(file, "INFO", "Svc", "x"), rec(file, "ERROR", "Svc", "y")],
            ));
        }
        (registry, id)
    }

    fn visible_files(registry: &ViewRegistry, id: ViewId) -> BTreeSet<PathBuf> {
        let view = registry.get(id).unwrap();
        (0..view.row_count())
            .filter_map(|r| view.record_at(r))
            .map(|r| r.source_path.clone())
            .collect()
    }

    #[test]
    fn test_toggle_show_only_target_hides_everything() {
        let (mut registry, id) = three_file_view();
        registry.set_show_only(id, Some(PathBuf::from("b.log")));
        assert_eq!(visible_files(&registry, id).len(), 1);

        registry.toggle_visibility(id, Path::new("b.log"));
        assert_eq!(registry.show_only(id), None);
        assert_eq!(registry.hidden(id).len(), 3);
        assert_eq!(registry.get(id).unwrap().row_count(), 0);
    }

    #[test]
    fn test_toggle_other_file_under_show_only_keeps_both_visible() {
        let (mut registry, id) = three_file_view();
        registry.set_show_only(id, Some(PathBuf::from("b.log")));

        registry.toggle_visibility(id, Path::new("c.log"));
        assert_eq!(registry.show_only(id), None);
        assert_eq!(
            registry.hidden(id),
            BTreeSet::from([PathBuf::from("a.log")])
        );
        assert_eq!(
            visible_files(&registry, id),
            BTreeSet::from([PathBuf::from("b.log"), PathBuf::from("c.log")])
        );
    }

    #[test]
    fn test_toggle_without_show_only_flips_hidden_membership() {
        let (mut registry, id) = three_file_view();
        registry.toggle_visibility(id, Path::new("a.log"));
        assert!(registry.hidden(id).contains(Path::new("a.log")));
        registry.toggle_visibility(id, Path::new("a.log"));
        assert!(registry.hidden(id).is_empty());
    }

    #[test]
    fn test_snapshot_round_trip_onto_fresh_view() {
        let (mut registry, id) = three_file_view();
        registry.set_levels(id, ["error"]);
        registry.set_search(id, "y", SearchField::Message, false);
        registry.hide(id, Path::new("c.log"));
        {
            let view = registry.get_mut(id).unwrap();
            view.set_title("Service");
            view.set_page_size(10);
            view.sort(Column::Timestamp, SortOrder::Descending);
        }
        let snapshot = registry.export_snapshot(id);

        let mut other = ViewRegistry::new(100, true);
        let fresh = ViewId(42);
        other.ensure_view(fresh);
        other.import_snapshot(fresh, &snapshot);

        assert_eq!(other.export_snapshot(fresh).filter, snapshot.filter);
        let restored = other.export_snapshot(fresh);
        assert_eq!(restored.page_size, 10);
        assert_eq!(restored.current_page, snapshot.current_page);
        assert_eq!(restored.sort_column, Some(Column::Timestamp));
        assert_eq!(restored.sort_order, SortOrder::Descending);
        assert_eq!(restored.title, "Service");
        assert_eq!(snapshot.loaded_files.len(), 3);
    }

    #[test]
    fn test_restored_page_applies_once_rows_arrive() {
        let mut registry = ViewRegistry::new(10, true);
        let id = registry.create_view();
        let snapshot = ViewSnapshot {
            page_size: 10,
            current_page: 3,
            ..ViewSnapshot::default()
        };
        registry.import_snapshot(id, &snapshot);
        assert_eq!(registry.export_snapshot(id).current_page, 3);

        let records = (0..25).map(|i| rec("a.log", "INFO", "Svc", &i.to_string())).collect();
        registry.get_mut(id).unwrap().add_file(Path::new("a.log"));
        registry.apply_event(batch(id, "a.log", records));
        let view = registry.get(id).unwrap();
        assert_eq!(view.paging().current_page(), 3);
        assert_eq!(view.row_count(), 5);
    }

    #[test]
    fn test_missing_view_is_tolerated() {
        let mut registry = ViewRegistry::new(10, true);
        let ghost = ViewId(99);
        registry.set_app_filter(ghost, "Svc");
        registry.toggle_visibility(ghost, Path::new("a.log"));
        registry.apply_event(batch(ghost, "a.log", vec![rec("a.log", "INFO", "Svc", "x")]));
        registry.import_snapshot(ghost, &ViewSnapshot::default());

        assert!(registry.is_empty());
        assert_eq!(registry.app_filter(ghost), "");
        assert!(registry.level_counts(ghost).is_empty());
        assert_eq!(registry.export_snapshot(ghost), ViewSnapshot::default());
        assert_eq!(registry.search(ghost), (String::new(), SearchField::All, false));
    }

    #[test]
    fn test_batch_for_removed_file_is_dropped() {
        let (mut registry, id) = three_file_view();
        registry.remove_file(id, Path::new("a.log"));
        registry.apply_event(batch(id, "a.log", vec![rec("a.log", "INFO", "Svc", "late")]));
        assert_eq!(registry.get(id).unwrap().records().len(), 4);
    }

    #[test]
    fn test_removing_last_file_closes_view() {
        let (mut registry, id) = three_file_view();
        assert_eq!(registry.remove_file(id, Path::new("a.log")), FileRemoval::Removed);
        assert_eq!(registry.remove_file(id, Path::new("a.log")), FileRemoval::NotFound);
        assert_eq!(registry.get(id).unwrap().records().len(), 4);
        registry.remove_file(id, Path::new("b.log"));
        match registry.remove_file(id, Path::new("c.log")) {
            FileRemoval::ViewClosed { view, .. } => assert_eq!(view, id),
            other => panic!("expected view to close, got {other:?}"),
        }
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_error_is_recorded_and_file_stays_listed() {
        let (mut registry, id) = three_file_view();
        registry.get_mut(id).unwrap().add_file(Path::new("bad.log"));
        registry.apply_event(IngestEvent::Error {
            view: id,
            path: PathBuf::from("bad.log"),
            message: "Cannot open".to_string(),
        });
        let view = registry.get(id).unwrap();
        // Unlisting is the owner's job, so the catalog stays in step.
        assert_eq!(view.loaded_files().len(), 4);
        assert!(!view.has_records_from(Path::new("bad.log")));
        assert!(view.has_records_from(Path::new("a.log")));
        assert_eq!(view.last_error(), Some("Cannot open"));
        assert!(view.progress().is_none());
    }

    #[test]
    fn test_level_counts_and_highlights_through_registry() {
        let (mut registry, id) = three_file_view();
        let counts = registry.level_counts(id);
        assert_eq!(counts.get("INFO"), Some(&3));
        assert_eq!(counts.get("ERROR"), Some(&3));

        registry.set_search(id, "Y", SearchField::Message, false);
        let view = registry.get_mut(id).unwrap();
        assert_eq!(view.row_count(), 3);
        assert_eq!(
            view.highlight_ranges(0, Column::Message),
            &[HighlightRange { start: 0, len: 1 }]
        );
        assert!(view.highlight_ranges(0, Column::Level).is_empty());
    }

    #[test]
    fn test_suggest_title_prefers_app_name() {
        let record = rec("/var/log/api.log", "INFO", "Gateway", "up");
        assert_eq!(suggest_title(Some(&record), Path::new("/var/log/api.log")), "Gateway");
        assert_eq!(suggest_title(None, Path::new("/var/log/api.log")), "api");
    }
}
