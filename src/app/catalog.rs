// LogLens - app/catalog.rs
//
// Loaded files grouped by application name, for the sidebar tree.
// Notified whenever a file is added to or removed from a view.

use crate::core::model::ViewId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub view: ViewId,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct FileCatalog {
    /// Application name -> files, sorted by name.
    groups: BTreeMap<String, Vec<CatalogEntry>>,
}

impl FileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_added(&mut self, view: ViewId, path: &Path, app_name: &str) {
        let entry = CatalogEntry {
            view,
            path: path.to_path_buf(),
        };
        if self.groups.values().any(|files| files.contains(&entry)) {
            return;
        }
        tracing::debug!(%view, file = %path.display(), app = app_name, "Catalog add");
        self.groups
            .entry(app_name.to_string())
            .or_default()
            .push(entry);
    }

    pub fn file_removed(&mut self, view: ViewId, path: &Path) {
        self.retain(|e| !(e.view == view && e.path == path));
    }

    /// Drop every entry of a closed view.
    pub fn view_removed(&mut self, view: ViewId) {
        self.retain(|e| e.view != view);
    }

    fn retain(&mut self, keep: impl Fn(&CatalogEntry) -> bool) {
        for files in self.groups.values_mut() {
            files.retain(&keep);
        }
        self.groups.retain(|_, files| !files.is_empty());
    }

    /// Groups in application-name order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[CatalogEntry])> {
        self.groups
            .iter()
            .map(|(app, files)| (app.as_str(), files.as_slice()))
    }

    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
