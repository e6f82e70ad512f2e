// LogLens - app/session.rs
//
// Session persistence: save and restore every open view between
// application restarts.
//
// - Saved atomically (write temp, rename to final) so a crash during save
//   never corrupts the previous good session.
// - Load problems (missing, corrupt, wrong version) start the app fresh.
// - Records are NOT persisted. Each view's files are re-queued on restore so
//   the view reflects current file content.

use crate::app::view::ViewSnapshot;
use crate::core::model::ViewId;
use crate::util::constants::SESSION_FILE_NAME;
use crate::util::error::SessionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version stamp for forward-compatibility checks. Mismatches discard the
/// session.
pub const SESSION_VERSION: u32 = 1;

/// One persisted view: its id at save time plus its settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub id: ViewId,
    #[serde(flatten)]
    pub snapshot: ViewSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Must equal `SESSION_VERSION` to be accepted.
    pub version: u32,

    /// Views in tab order.
    #[serde(default)]
    pub views: Vec<SessionView>,

    /// The tab that was selected.
    #[serde(default)]
    pub current_view: Option<ViewId>,
}

impl SessionData {
    pub fn new(views: Vec<SessionView>, current_view: Option<ViewId>) -> Self {
        Self {
            version: SESSION_VERSION,
            views,
            current_view,
        }
    }
}

pub fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

/// Save `data` to `path` atomically, creating parent directories as needed.
pub fn save(data: &SessionData, path: &Path) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionError::Io {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let json =
        serde_json::to_string_pretty(data).map_err(|e| SessionError::Json { source: e })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|e| SessionError::Io {
        path: tmp.clone(),
        operation: "write",
        source: e,
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        SessionError::Io {
            path: path.to_path_buf(),
            operation: "rename",
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), views = data.views.len(), "Session saved");
    Ok(())
}

/// Load a `SessionData` from `path`. `None` means "start fresh".
pub fn load(path: &Path) -> Option<SessionData> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read session file");
            }
        })
        .ok()?;

    let data: SessionData = serde_json::from_str(&content)
        .map_err(|e| {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Session file is malformed, starting fresh"
            );
        })
        .ok()?;

    if data.version != SESSION_VERSION {
        tracing::warn!(
            found = data.version,
            expected = SESSION_VERSION,
            "Session file version mismatch, starting fresh"
        );
        return None;
    }

    tracing::info!(path = %path.display(), views = data.views.len(), "Session file loaded");
    Some(data)
}
