// LogLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Every tunable that config.toml can override has a default, a minimum and
// an absolute maximum here so validation never uses magic numbers.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogLens";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Ingestion
// =============================================================================

/// Number of parsed records accumulated by the stream worker before a
/// `WorkerEvent::Batch` is sent.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Minimum user-configurable batch size.
pub const MIN_BATCH_SIZE: usize = 1;

/// Maximum user-configurable batch size.
pub const MAX_BATCH_SIZE: usize = 100_000;

/// How many times a transient mid-stream failure is re-run before the
/// error is surfaced.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Hard upper bound on configurable retries.
pub const ABSOLUTE_MAX_RETRIES: u32 = 20;

/// Fixed delay between a failed run and its re-run (ms).
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;

/// Maximum configurable retry delay (ms).
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Minimum number of bytes the worker must advance before another
/// `WorkerEvent::Progress` is sent. Keeps progress traffic coarse on
/// multi-gigabyte files.
pub const PROGRESS_STEP_BYTES: u64 = 1024 * 1024; // 1 MiB

/// Number of lines `read_first_entry` examines before giving up.
pub const FIRST_ENTRY_PEEK_LINES: usize = 200;

// =============================================================================
// Views and paging
// =============================================================================

/// Rows per page when paging is enabled.
pub const DEFAULT_PAGE_SIZE: usize = 1_000;

/// Minimum user-configurable page size.
pub const MIN_PAGE_SIZE: usize = 10;

/// Maximum user-configurable page size.
pub const MAX_PAGE_SIZE: usize = 1_000_000;

/// Number of source rows above which sorting switches to rayon's parallel
/// stable sort.
pub const PARALLEL_SORT_THRESHOLD: usize = 50_000;

// =============================================================================
// Parsing
// =============================================================================

/// Built-in line grammar used when config.toml does not override it.
///
/// Matches lines such as
/// `2024-01-15 14:30:22.123 [ERROR] [Billing] Payment declined` and
/// `2024-01-15T14:30:22Z INFO Started`.
pub const DEFAULT_LINE_PATTERN: &str = r"^(?P<timestamp>\d{4}[-/]\d{2}[-/]\d{2}[ T]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)\s+\[?(?P<level>[A-Za-z]+)\]?\s+(?:\[(?P<app>[^\]]+)\]\s+)?(?P<message>.*)$";

/// Maximum regex pattern length to prevent ReDoS.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Per-frame UI message budgets
// =============================================================================

/// Maximum number of ingest events applied by the UI update loop per frame.
/// Remaining events stay buffered in the controller for the next frame.
pub const MAX_INGEST_EVENTS_PER_FRAME: usize = 500;

/// Maximum number of non-fatal warnings retained for the status area.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Session persistence file name (stored in the platform data directory).
pub const SESSION_FILE_NAME: &str = "session.json";
