// LogLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers: the records the
// worker produces, the scheduling unit the queue owns, and the events that
// cross the worker / service / controller boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Record (normalised output of parsing)
// =============================================================================

/// A single parsed log line.
///
/// Records are immutable once produced by the line parser. The timestamp is
/// kept as the raw captured text; it is only interpreted as an instant when
/// a view sorts by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Raw timestamp text as captured by the grammar.
    pub timestamp: String,

    /// Raw level text (e.g. "ERROR", "Info").
    pub level: String,

    /// Message body.
    pub message: String,

    /// Application name; falls back to the file stem when the line has none.
    pub app_name: String,

    /// Path to the file the record was read from.
    pub source_path: PathBuf,
}

impl Record {
    /// Text of the given column for display, sorting, and searching.
    pub fn field(&self, column: Column) -> std::borrow::Cow<'_, str> {
        match column {
            Column::Timestamp => self.timestamp.as_str().into(),
            Column::Level => self.level.as_str().into(),
            Column::AppName => self.app_name.as_str().into(),
            Column::Message => self.message.as_str().into(),
            Column::Source => self.source_path.to_string_lossy(),
        }
    }
}

// =============================================================================
// Views and scheduling units
// =============================================================================

/// Opaque identifier of a view (tab).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Identifier of one `load_async` request, unique per loading service.
///
/// Every loader event carries the request it belongs to, so events from a
/// cancelled or superseded request can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// The unit of scheduling: one file to be streamed into one view.
///
/// Identity is pair equality; the same file may be queued for two
/// different views.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTarget {
    pub view: ViewId,
    pub path: PathBuf,
}

impl FileTarget {
    pub fn new(view: ViewId, path: impl Into<PathBuf>) -> Self {
        Self {
            view,
            path: path.into(),
        }
    }
}

// =============================================================================
// Columns, search fields, sort order
// =============================================================================

/// Table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Timestamp,
    Level,
    AppName,
    Message,
    Source,
}

impl Column {
    /// Returns all columns in display order.
    pub fn all() -> &'static [Column] {
        &[
            Column::Timestamp,
            Column::Level,
            Column::AppName,
            Column::Message,
            Column::Source,
        ]
    }

    /// Header label.
    pub fn label(&self) -> &'static str {
        match self {
            Column::Timestamp => "Timestamp",
            Column::Level => "Level",
            Column::AppName => "Application",
            Column::Message => "Message",
            Column::Source => "File",
        }
    }
}

/// Which text field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SearchField {
    Message,
    Level,
    AppName,
    /// Any of message, level, or app name.
    #[default]
    All,
}

impl SearchField {
    /// Returns all variants in display order.
    pub fn all() -> &'static [SearchField] {
        &[
            SearchField::All,
            SearchField::Message,
            SearchField::Level,
            SearchField::AppName,
        ]
    }

    /// Resolve a field name. Unrecognised names map to `All`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "message" => SearchField::Message,
            "level" => SearchField::Level,
            "app" | "app_name" | "application" => SearchField::AppName,
            _ => SearchField::All,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Message => "Message",
            SearchField::Level => "Level",
            SearchField::AppName => "Application",
            SearchField::All => "All fields",
        }
    }

    /// Whether a search on this field covers `column`.
    pub fn covers(&self, column: Column) -> bool {
        match self {
            SearchField::Message => column == Column::Message,
            SearchField::Level => column == Column::Level,
            SearchField::AppName => column == Column::AppName,
            SearchField::All => matches!(
                column,
                Column::Message | Column::Level | Column::AppName
            ),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// A character range within one cell's text (`start` and `len` count
/// `char`s, not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start: usize,
    pub len: usize,
}

// =============================================================================
// Event vocabularies
// =============================================================================

/// Messages sent from a stream worker thread to its owning service.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Bytes consumed so far out of the size measured at open time.
    Progress {
        path: PathBuf,
        bytes_read: u64,
        total: u64,
    },

    /// A group of parsed records, in file order. `end_offset` is the byte
    /// offset just past the last line consumed before the flush.
    Batch {
        path: PathBuf,
        records: Vec<Record>,
        end_offset: u64,
    },

    /// Opening or reading failed.
    Error { path: PathBuf, message: String },

    /// The run has ended (completed, cancelled, or after an error).
    Finished { path: PathBuf },
}

/// File-scoped events emitted by the loading service, tagged with the
/// request that produced them.
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    Progress {
        request: RequestId,
        path: PathBuf,
        bytes_read: u64,
        total: u64,
    },
    Batch {
        request: RequestId,
        path: PathBuf,
        records: Vec<Record>,
    },
    Error {
        request: RequestId,
        path: PathBuf,
        message: String,
    },
    Finished {
        request: RequestId,
        path: PathBuf,
    },
    /// No ingestion work is outstanding for `request`.
    Idle { request: RequestId },
}

impl LoaderEvent {
    pub fn request(&self) -> RequestId {
        match self {
            Self::Progress { request, .. }
            | Self::Batch { request, .. }
            | Self::Error { request, .. }
            | Self::Finished { request, .. }
            | Self::Idle { request } => *request,
        }
    }
}

/// View-scoped events emitted by the ingest controller.
#[derive(Debug, Clone)]
pub enum IngestEvent {
    Progress {
        view: ViewId,
        path: PathBuf,
        bytes_read: u64,
        total: u64,
    },
    Batch {
        view: ViewId,
        path: PathBuf,
        records: Vec<Record>,
    },
    Error {
        view: ViewId,
        path: PathBuf,
        message: String,
    },
    Finished {
        view: ViewId,
        path: PathBuf,
    },
    /// The controller is idle after advancing its queue.
    Idle,
}
